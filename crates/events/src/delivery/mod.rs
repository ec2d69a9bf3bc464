//! External delivery channels for publication notifications.

pub mod email;
