pub use super::alarm_config::Entity as AlarmConfig;
pub use super::alarm_event::Entity as AlarmEvent;
pub use super::alarm_state::Entity as AlarmState;
pub use super::emergency_contact::Entity as EmergencyContact;
pub use super::user_profile::Entity as UserProfile;
