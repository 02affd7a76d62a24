//! Per-connection settings.

use crate::buffer::DEFAULT_SEGMENT_SIZE;
use crate::handler::DefaultRoute;

/// Default capacity reserved for each socket read
pub const DEFAULT_READ_BUFFER_SIZE: usize = 8 * 1024;

/// Default size hint for the region claimed per drained batch, room for
/// sixteen pipelined responses
pub const DEFAULT_WRITE_SIZE_HINT: usize = 160 * 16;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConnectionConfig {
    /// Response for requests that match no route
    pub default_route: DefaultRoute,
    /// Bytes reserved in the inbound buffer before every socket read
    pub read_buffer_size: usize,
    /// Minimum region claimed when a batch of responses starts
    pub write_size_hint: usize,
    /// Size of the regions the outbound buffer hands out
    pub segment_size: usize,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            default_route: DefaultRoute::default(),
            read_buffer_size: DEFAULT_READ_BUFFER_SIZE,
            write_size_hint: DEFAULT_WRITE_SIZE_HINT,
            segment_size: DEFAULT_SEGMENT_SIZE,
        }
    }
}

impl ConnectionConfig {
    pub fn with_default_route(mut self, default_route: DefaultRoute) -> Self {
        self.default_route = default_route;
        self
    }

    pub fn with_read_buffer_size(mut self, read_buffer_size: usize) -> Self {
        self.read_buffer_size = read_buffer_size.max(1);
        self
    }

    pub fn with_write_size_hint(mut self, write_size_hint: usize) -> Self {
        self.write_size_hint = write_size_hint;
        self
    }

    pub fn with_segment_size(mut self, segment_size: usize) -> Self {
        self.segment_size = segment_size.max(1);
        self
    }
}
