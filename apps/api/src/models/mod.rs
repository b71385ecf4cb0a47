pub mod answer;
pub mod profile;
