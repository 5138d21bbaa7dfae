pub mod cloud_mail;
pub mod local_mail;
