pub mod generate;
pub mod init;
pub mod judge;
pub mod score;
pub mod trend;
pub mod validate;
