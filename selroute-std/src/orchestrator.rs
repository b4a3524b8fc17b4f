//! # Deployment Orchestrator
//!
//! Publishes a set of implementation units, derives the selectors each one
//! exposes, builds the combined [`DispatchTable`] and finally publishes a
//! router front that embeds it.
//!
//! [`DispatchTable`]: crate::table::DispatchTable
//!
//! Every step is awaited before the next one starts. A failure aborts the
//! run; units published before the failure are left where they are.

use crate::{interface, router::RouterFront, table};
use indexmap::{IndexMap, IndexSet};
use selroute_core::{
    Address, Artifact, DispatchEntry, OrchestrationError, PublishArgs, Publisher, Selector,
    Signature, UnitRoutes,
};
use std::path::Path;

/// Configuration for an [`Orchestrator`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct OrchestratorConfig {
    verbose: bool,
}

impl OrchestratorConfig {
    /// Create the default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report each publish and selector mapping at `info` instead of `debug`.
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Returns true if verbose reporting is on.
    pub fn is_verbose(&self) -> bool {
        self.verbose
    }
}

/// A published implementation unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImplementationUnit {
    /// Name the unit was published under.
    pub name: String,
    /// Stable address assigned by the publisher.
    pub address: Address,
    /// Operations the unit exposes, in declaration order.
    pub signatures: Vec<Signature>,
    /// Distinct selectors of those operations, in first-seen order.
    pub selectors: Vec<Selector>,
}

impl ImplementationUnit {
    /// The unit in the form a router front embeds.
    pub fn routes(&self) -> UnitRoutes {
        UnitRoutes::new(self.address, self.selectors.iter().copied())
    }
}

/// The result of a successful [`Orchestrator::orchestrate`] run.
#[derive(Debug, Clone)]
pub struct Deployment {
    router: RouterFront,
    units: IndexMap<String, ImplementationUnit>,
    entries: Vec<DispatchEntry>,
}

impl Deployment {
    /// The published router front.
    pub fn router(&self) -> &RouterFront {
        &self.router
    }

    /// Published units by name, in publish order.
    pub fn units(&self) -> &IndexMap<String, ImplementationUnit> {
        &self.units
    }

    /// Look up a published unit by name.
    pub fn unit(&self, name: &str) -> Option<&ImplementationUnit> {
        self.units.get(name)
    }

    /// Every `(selector, target)` pair the router serves.
    pub fn entries(&self) -> &[DispatchEntry] {
        &self.entries
    }

    /// Take the deployment apart.
    pub fn into_parts(
        self,
    ) -> (
        RouterFront,
        IndexMap<String, ImplementationUnit>,
        Vec<DispatchEntry>,
    ) {
        (self.router, self.units, self.entries)
    }
}

/// Drives a deployment through a [`Publisher`].
///
/// # Example
///
/// ```rust,ignore
/// let deployment = Orchestrator::new(&sandbox)
///     .with_config(OrchestratorConfig::new().verbose(true))
///     .orchestrate(&[controller, view], &router)
///     .await?;
///
/// for entry in deployment.entries() {
///     println!("{entry}");
/// }
/// ```
#[derive(Debug, Clone)]
pub struct Orchestrator<P> {
    publisher: P,
    config: OrchestratorConfig,
}

impl<P: Publisher> Orchestrator<P> {
    /// Create an orchestrator over `publisher` with the default configuration.
    pub fn new(publisher: P) -> Self {
        Self {
            publisher,
            config: OrchestratorConfig::default(),
        }
    }

    /// Replace the configuration.
    pub fn with_config(mut self, config: OrchestratorConfig) -> Self {
        self.config = config;
        self
    }

    /// The active configuration.
    pub fn config(&self) -> &OrchestratorConfig {
        &self.config
    }

    /// The underlying publisher.
    pub fn publisher(&self) -> &P {
        &self.publisher
    }

    /// Publish `units`, then a router front built from their selectors.
    ///
    /// # Errors
    ///
    /// - [`OrchestrationError::DuplicateUnitName`] if two units share a name
    /// - [`OrchestrationError::InitializerArgumentsNotSupported`] if a unit
    ///   declares initializer parameters; raised before that unit is published
    /// - [`OrchestrationError::PublishFailed`] if the publisher fails
    /// - [`OrchestrationError::MalformedInterface`] if a unit's interface
    ///   cannot be extracted
    /// - [`OrchestrationError::SelectorCollision`] if two units expose the
    ///   same selector; the router is not published
    pub async fn orchestrate(
        &self,
        units: &[P::Source],
        router: &P::Source,
    ) -> Result<Deployment, OrchestrationError> {
        let mut published: IndexMap<String, ImplementationUnit> = IndexMap::new();

        for source in units {
            let unit = self.publish_unit(source, &published).await?;
            published.insert(unit.name.clone(), unit);
        }

        // Units with nothing to route are still reported, just not embedded.
        let routes: Vec<UnitRoutes> = published
            .values()
            .filter(|unit| !unit.selectors.is_empty())
            .map(ImplementationUnit::routes)
            .collect();
        let table = table::build(&routes)?;

        let address = self
            .publisher
            .publish(router, &PublishArgs::Routes(routes))
            .await
            .map_err(|source| OrchestrationError::PublishFailed {
                unit: router.name().to_string(),
                source,
            })?;

        #[cfg(feature = "tracing")]
        tracing::info!(router = %address, routes = table.len(), "router published");

        let entries = table.entries();
        Ok(Deployment {
            router: RouterFront::new(address, table),
            units: published,
            entries,
        })
    }

    async fn publish_unit(
        &self,
        source: &P::Source,
        published: &IndexMap<String, ImplementationUnit>,
    ) -> Result<ImplementationUnit, OrchestrationError> {
        let name = source.name();
        if published.contains_key(name) {
            return Err(OrchestrationError::DuplicateUnitName {
                unit: name.to_string(),
            });
        }

        let params = interface::initializer_params(source.interface());
        if params > 0 {
            return Err(OrchestrationError::InitializerArgumentsNotSupported {
                unit: name.to_string(),
                params,
            });
        }

        let address = self
            .publisher
            .publish(source, &PublishArgs::None)
            .await
            .map_err(|source| OrchestrationError::PublishFailed {
                unit: name.to_string(),
                source,
            })?;
        self.report_unit(name, address);

        let signatures = interface::extract(source.interface()).map_err(|source| {
            OrchestrationError::MalformedInterface {
                unit: name.to_string(),
                source,
            }
        })?;

        let selectors: IndexSet<Selector> = signatures.iter().map(Signature::selector).collect();
        let unit = ImplementationUnit {
            name: name.to_string(),
            address,
            signatures,
            selectors: selectors.into_iter().collect(),
        };
        self.report_selectors(&unit);

        Ok(unit)
    }

    #[cfg(feature = "tracing")]
    fn report_unit(&self, name: &str, address: Address) {
        if self.config.verbose {
            tracing::info!(unit = name, %address, "unit published");
        } else {
            tracing::debug!(unit = name, %address, "unit published");
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn report_unit(&self, _name: &str, _address: Address) {}

    #[cfg(feature = "tracing")]
    fn report_selectors(&self, unit: &ImplementationUnit) {
        for signature in &unit.signatures {
            let selector = signature.selector();
            if self.config.verbose {
                tracing::info!(unit = %unit.name, %selector, %signature, "mapped");
            } else {
                tracing::debug!(unit = %unit.name, %selector, %signature, "mapped");
            }
        }
    }

    #[cfg(not(feature = "tracing"))]
    fn report_selectors(&self, _unit: &ImplementationUnit) {}
}

/// Orchestrate with the default configuration.
pub async fn orchestrate<P: Publisher>(
    publisher: P,
    units: &[P::Source],
    router: &P::Source,
) -> Result<Deployment, OrchestrationError> {
    Orchestrator::new(publisher).orchestrate(units, router).await
}

/// Name a unit after its artifact file: `contracts/proxy/view.vy` → `view`.
///
/// Falls back to the whole path when there is no file stem.
pub fn unit_name_from_path(path: impl AsRef<Path>) -> String {
    let path = path.as_ref();
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.to_string_lossy().into_owned())
}
