//! Registered TCP ports of well-known schemes.

/// Standard port of `scheme`, as listed in the services database.
///
/// `scheme` is expected in lowercase.
pub fn standard_port(scheme: &str) -> Option<u16> {
    let port = match scheme {
        "ftp" => 21,
        "ssh" => 22,
        "telnet" => 23,
        "smtp" => 25,
        "gopher" => 70,
        "http" => 80,
        "pop3" => 110,
        "nntp" => 119,
        "imap" => 143,
        "snmp" => 161,
        "ldap" => 389,
        "https" => 443,
        "rtsp" => 554,
        "ldaps" => 636,
        "imaps" => 993,
        "pop3s" => 995,
        _ => return None,
    };
    Some(port)
}
