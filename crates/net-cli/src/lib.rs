//! netcfg CLI
//!
//! Command-line front end for writing netplan configuration and udev
//! naming rules from interface descriptor files, and for restarting the
//! network service afterwards.

pub mod commands;
