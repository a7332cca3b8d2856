//! Members and their coaching journals

pub mod journal;
pub mod member;

pub use journal::JournalService;
pub use member::MemberService;
