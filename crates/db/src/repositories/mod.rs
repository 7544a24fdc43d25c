//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod contract_template_repo;
pub mod destination_repo;
pub mod email_job_repo;
pub mod landing_section_repo;
pub mod lead_repo;
pub mod notification_repo;
pub mod password_reset_repo;
pub mod proposal_repo;
pub mod proposal_template_repo;
pub mod role_repo;
pub mod session_repo;
pub mod team_member_repo;
pub mod team_repo;
pub mod user_repo;
pub mod vendor_repo;
pub mod vibe_repo;
pub mod wedding_plan_repo;

pub use contract_template_repo::ContractTemplateRepo;
pub use destination_repo::DestinationRepo;
pub use email_job_repo::EmailJobRepo;
pub use landing_section_repo::LandingSectionRepo;
pub use lead_repo::LeadRepo;
pub use notification_repo::NotificationRepo;
pub use password_reset_repo::PasswordResetRepo;
pub use proposal_repo::ProposalRepo;
pub use proposal_template_repo::ProposalTemplateRepo;
pub use role_repo::RoleRepo;
pub use session_repo::SessionRepo;
pub use team_member_repo::TeamMemberRepo;
pub use team_repo::TeamRepo;
pub use user_repo::UserRepo;
pub use vendor_repo::VendorRepo;
pub use vibe_repo::VibeRepo;
pub use wedding_plan_repo::WeddingPlanRepo;
