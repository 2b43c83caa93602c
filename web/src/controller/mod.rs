pub(crate) mod chat_completions_simulator_controller;
pub(crate) mod health_check_controller;
pub(crate) mod publish_controller;
