pub mod handler_404;
pub mod host_guard;
