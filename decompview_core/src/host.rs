//! The host application's "current offset".

/// Receiver of offset-changed notifications.
pub trait OffsetListener {
    /// The host's current offset changed to `offset`.
    fn offset_changed(&mut self, offset: u64);
}

/// Host application owning the shared current offset.
pub trait OffsetHost {
    /// Current offset, or `None` when nothing is focused yet.
    fn current_offset(&self) -> Option<u64>;

    /// Seek the host to `address`.
    ///
    /// Implementations update their offset and broadcast the change to
    /// `listener` (and any other subscribers) before returning.
    fn request_seek(&mut self, address: u64, listener: &mut dyn OffsetListener);
}

/// Minimal host that only stores the offset and echoes every seek.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct StaticHost {
    offset: Option<u64>,
}

impl StaticHost {
    /// Create a host focused on `offset`.
    #[must_use]
    pub const fn new(offset: Option<u64>) -> Self {
        Self { offset }
    }

    /// Change the offset without notifying anyone.
    pub fn set_offset(&mut self, offset: Option<u64>) {
        self.offset = offset;
    }
}

impl OffsetHost for StaticHost {
    fn current_offset(&self) -> Option<u64> {
        self.offset
    }

    fn request_seek(&mut self, address: u64, listener: &mut dyn OffsetListener) {
        self.offset = Some(address);
        listener.offset_changed(address);
    }
}
