pub mod inspect;
pub mod publish;
