pub mod employee;
pub mod event;
pub mod memo;
pub mod payslip;

pub use employee::EmployeeRepository;
pub use event::CalendarEventRepository;
pub use memo::DayMemoRepository;
pub use payslip::PayrollRepository;
