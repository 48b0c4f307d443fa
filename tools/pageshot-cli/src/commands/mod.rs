pub mod assemble;
pub mod capture;
pub mod check;
pub mod list;
