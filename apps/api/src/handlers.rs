pub mod audit;
pub mod dashboard;
pub mod health;
pub mod notifications;
pub mod preferences;
pub mod rows;
pub mod sharing;
pub mod tables;
pub mod tasks;
pub mod users;

#[cfg(test)]
pub(crate) mod test_support;
