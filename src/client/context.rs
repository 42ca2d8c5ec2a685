//! Shared state handed to every façade

use crate::config::HttpSettings;
use crate::output::PointWriter;
use crate::version::VersionResolver;
use std::sync::Arc;

/// Resolver, writer and HTTP settings shared by all façades of a process
#[derive(Clone)]
pub struct ClientContext {
    pub resolver: VersionResolver,
    pub writer: Arc<dyn PointWriter>,
    pub http: HttpSettings,
}

impl ClientContext {
    pub fn new(resolver: VersionResolver, writer: Arc<dyn PointWriter>, http: HttpSettings) -> Self {
        Self {
            resolver,
            writer,
            http,
        }
    }
}

impl std::fmt::Debug for ClientContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ClientContext")
            .field("resolver", &self.resolver)
            .field("http", &self.http)
            .finish_non_exhaustive()
    }
}
