pub mod clock;
pub mod codegen;
pub mod db;
