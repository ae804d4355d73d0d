pub mod card;
pub mod label_badge;
pub mod navbar;
pub mod profile_card;
pub mod sidebar;
