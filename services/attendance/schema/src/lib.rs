//! sea-orm entities for the attendance service.

pub mod accounts;
pub mod makeup_attendance;
pub mod makeup_classes;
pub mod profiles;
pub mod remedial_codes;
