pub mod chatbot;
pub mod goodbye;
pub mod member_join;
pub mod welcome;
