//! Database models, one aggregate per file.

pub mod employee;
pub mod event;
pub mod memo;
pub mod payslip;

pub use self::employee::*;
pub use self::event::*;
pub use self::memo::*;
pub use self::payslip::*;
