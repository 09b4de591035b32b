pub(crate) mod client_manager;
