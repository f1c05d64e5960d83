pub const DEFAULT_STUN_ADDR: &str = "stun:stun.l.google.com:19302";

pub const DEFAULT_SERVER_PORT: u16 = 3000;
