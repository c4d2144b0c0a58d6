use tailspool_fs::PromoteOptions;

#[derive(Clone, Copy, Debug)]
pub struct Options {
    sync_on_finalize: bool,
    promote:          PromoteOptions,
}

impl Default for Options {
    fn default() -> Self { Self::new() }
}

impl Options {
    pub fn new() -> Self {
        Self {
            sync_on_finalize: true,
            promote:          PromoteOptions::new(),
        }
    }

    /// Flush appended bytes to durable storage before promoting.
    pub fn sync_on_finalize(mut self, sync: bool) -> Self {
        self.sync_on_finalize = sync;
        self
    }

    pub fn promote(mut self, promote: PromoteOptions) -> Self {
        self.promote = promote;
        self
    }

    pub fn get_sync_on_finalize(&self) -> bool { self.sync_on_finalize }

    pub fn get_promote(&self) -> PromoteOptions { self.promote }
}
