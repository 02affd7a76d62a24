/// Request shapes a plaintext client sends.
#[derive(Debug, Copy, Clone)]
pub struct Workload {
    name: &'static str,
    request: &'static [u8],
    depth: usize,
}

pub const PLAINTEXT_REQUEST: &[u8] = b"GET /plaintext HTTP/1.1\r\n\
    Host: server\r\n\
    User-Agent: Mozilla/5.0 (X11; Linux x86_64) Gecko/20130501 Firefox/30.0 AppleWebKit/600.00 Chrome/30.0.0000.0 Trident/10.0 Safari/600.00\r\n\
    Cookie: uid=12345678901234567890; __utma=1.1234567890.1234567890.1234567890.1234567890.12; wd=2560x1600\r\n\
    Accept: text/html,application/xhtml+xml,application/xml;q=0.9,*/*;q=0.8\r\n\
    Accept-Language: en-US,en;q=0.5\r\n\
    Connection: keep-alive\r\n\r\n";

pub const MINIMAL_REQUEST: &[u8] = b"GET /plaintext HTTP/1.1\r\nHost: server\r\n\r\n";

impl Workload {
    pub const fn new(name: &'static str, request: &'static [u8], depth: usize) -> Self {
        Self { name, request, depth }
    }

    pub const fn single(name: &'static str, request: &'static [u8]) -> Self {
        Self::new(name, request, 1)
    }

    /// `depth` copies of `request` back to back, the shape of a pipelining client
    pub const fn pipelined(name: &'static str, request: &'static [u8], depth: usize) -> Self {
        Self::new(name, request, depth)
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn depth(&self) -> usize {
        self.depth
    }

    pub fn payload(&self) -> Vec<u8> {
        self.request.repeat(self.depth)
    }
}

pub fn plaintext_workloads() -> Vec<Workload> {
    vec![
        Workload::single("minimal", MINIMAL_REQUEST),
        Workload::single("browser", PLAINTEXT_REQUEST),
        Workload::pipelined("browser_x16", PLAINTEXT_REQUEST, 16),
        Workload::pipelined("minimal_x256", MINIMAL_REQUEST, 256),
    ]
}
