//! Filesystem Driver Registry
//!
//! This module manages registration and lookup of filesystem driver
//! instances. Each record is keyed by a dense descriptor and tagged with
//! the identity of the module that owns the driver, which the dispatcher
//! uses to arbitrate between locally hosted and remote drivers.

use alloc::sync::Arc;
use alloc::vec::Vec;

use super::driver::FsDriver;
use super::node::FsDescriptor;

/// Where a registered driver is hosted.
///
/// The vendor/product pair `(0, 0)` denotes a locally hosted driver; any
/// other identity belongs to a remote module. No remote-dispatch transport
/// exists yet, so `Remote` records are rejected at dispatch time instead
/// of being invoked.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DriverHost {
    Local,
    Remote { vendor: u32, product: u32 },
}

impl DriverHost {
    /// Classify an owning identity.
    pub fn from_owner(vendor: u32, product: u32) -> Self {
        if vendor == 0 && product == 0 {
            Self::Local
        } else {
            Self::Remote { vendor, product }
        }
    }

    pub fn is_local(&self) -> bool {
        matches!(self, Self::Local)
    }
}

/// One registration record.
#[derive(Clone)]
pub struct RegisteredFs {
    /// Descriptor this driver answers to.
    pub descriptor: FsDescriptor,
    /// Owning identity of the driver.
    pub host: DriverHost,
    /// The driver instance.
    pub driver: Arc<dyn FsDriver>,
}

/// Registry of filesystem drivers.
///
/// Records live in a growable vec scanned linearly; descriptors are dense
/// and assigned monotonically starting at 1.
pub struct DriverRegistry {
    records: Vec<RegisteredFs>,
    next_descriptor: FsDescriptor,
}

impl DriverRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            records: Vec::new(),
            next_descriptor: 0,
        }
    }

    /// Register a driver under a freshly assigned descriptor.
    ///
    /// Stamps the descriptor on the driver and appends the record. If the
    /// assigned descriptor somehow already exists, the existing record is
    /// returned rather than duplicated.
    pub fn register(
        &mut self,
        vendor: u32,
        product: u32,
        driver: Arc<dyn FsDriver>,
    ) -> FsDescriptor {
        self.next_descriptor += 1;
        let descriptor = self.next_descriptor;

        if let Some(existing) = self.find(descriptor) {
            log::warn!(
                "descriptor {} already registered, returning existing record",
                descriptor
            );
            return existing.descriptor;
        }

        driver.set_descriptor(descriptor);

        let host = DriverHost::from_owner(vendor, product);
        self.records.push(RegisteredFs {
            descriptor,
            host,
            driver,
        });

        log::info!(
            "registered filesystem (descriptor: {}, vendor: {:#x}, product: {:#x})",
            descriptor,
            vendor,
            product
        );

        descriptor
    }

    /// Remove a record. An unknown descriptor is reported and ignored.
    pub fn unregister(&mut self, descriptor: FsDescriptor) {
        match self.records.iter().position(|r| r.descriptor == descriptor) {
            Some(pos) => {
                self.records.remove(pos);
                log::info!("unregistered filesystem {}", descriptor);
            }
            None => {
                log::warn!("unregister of unknown filesystem {}", descriptor);
            }
        }
    }

    /// Look up a record by descriptor.
    pub fn find(&self, descriptor: FsDescriptor) -> Option<&RegisteredFs> {
        self.records.iter().find(|r| r.descriptor == descriptor)
    }

    /// Number of registered drivers.
    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

impl Default for DriverRegistry {
    fn default() -> Self {
        Self::new()
    }
}
