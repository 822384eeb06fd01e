pub mod alarm_config;
pub mod alarm_event;
pub mod alarm_state;
pub mod emergency_contact;
pub mod user_profile;

pub use alarm_config::Entity as AlarmConfig;
pub use alarm_event::Entity as AlarmEvent;
pub use alarm_state::Entity as AlarmState;
pub use emergency_contact::Entity as EmergencyContact;
pub use user_profile::Entity as UserProfile;

pub mod prelude;
