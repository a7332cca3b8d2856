//! Member aggregate

pub mod model;
pub mod repository;

pub use model::{format_member_number, parse_member_number, Member, MemberPatch, MemberRole, NewMember};
pub use repository::MemberRepository;
