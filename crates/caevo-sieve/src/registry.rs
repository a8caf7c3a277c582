//! Builds the configured sieve list by name

use crate::sieves::{
    AllVagueSieve, ClassifierSieve, EventCreationTimeSieve, PairScope, RepCreationDaySieve,
    TimeTimeSieve,
};
use crate::{PipelineConfig, PipelineError, Sieve};
use caevo_domain::{FeatureExtractor, ModelLoader};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, warn};

/// Resolves sieve names into ready-to-run sieves
///
/// Rule sieves are always available. Classifier sieves need a feature
/// extractor and a model loader; when either is missing or the model cannot
/// be loaded the sieve is left out with a warning.
#[derive(Default)]
pub struct SieveRegistry {
    extractor: Option<Arc<dyn FeatureExtractor>>,
    loader: Option<Arc<dyn ModelLoader>>,
    custom: HashMap<String, Arc<dyn Sieve>>,
}

impl SieveRegistry {
    /// Registry of the rule sieves only
    pub fn new() -> Self {
        Self::default()
    }

    /// Feature extractor handed to classifier sieves
    pub fn with_extractor(mut self, extractor: Arc<dyn FeatureExtractor>) -> Self {
        self.extractor = Some(extractor);
        self
    }

    /// Loader for classifier models, keyed by sieve name
    pub fn with_loader(mut self, loader: Arc<dyn ModelLoader>) -> Self {
        self.loader = Some(loader);
        self
    }

    /// Register a sieve under its own name, shadowing a built-in one
    pub fn register(&mut self, sieve: Arc<dyn Sieve>) {
        self.custom.insert(sieve.name().to_string(), sieve);
    }

    /// Sieves for `config`, in configured order
    ///
    /// # Errors
    ///
    /// Fails on a name that is neither built in nor registered.
    pub fn build(&self, config: &PipelineConfig) -> Result<Vec<Arc<dyn Sieve>>, PipelineError> {
        let mut sieves = Vec::with_capacity(config.sieves.len());
        for name in &config.sieves {
            if let Some(sieve) = self.resolve(name, config)? {
                debug!(sieve = %name, "Sieve enabled");
                sieves.push(sieve);
            }
        }
        Ok(sieves)
    }

    fn resolve(&self, name: &str, config: &PipelineConfig) -> Result<Option<Arc<dyn Sieve>>, PipelineError> {
        if let Some(sieve) = self.custom.get(name) {
            return Ok(Some(Arc::clone(sieve)));
        }

        let sieve: Arc<dyn Sieve> = match name {
            AllVagueSieve::NAME => Arc::new(AllVagueSieve),
            TimeTimeSieve::NAME => Arc::new(TimeTimeSieve),
            EventCreationTimeSieve::NAME => Arc::new(EventCreationTimeSieve),
            RepCreationDaySieve::NAME => {
                Arc::new(RepCreationDaySieve::new(config.rep_creation_day.clone()))
            }
            _ => match PairScope::from_sieve_name(name) {
                Some(scope) => return Ok(self.classifier(scope, config)),
                None => return Err(PipelineError::UnknownSieve(name.to_string())),
            },
        };
        Ok(Some(sieve))
    }

    fn classifier(&self, scope: PairScope, config: &PipelineConfig) -> Option<Arc<dyn Sieve>> {
        let name = scope.sieve_name();
        let (Some(extractor), Some(loader)) = (&self.extractor, &self.loader) else {
            warn!(sieve = name, "No feature extractor or model loader, sieve disabled");
            return None;
        };

        match loader.load(name) {
            Ok(model) => Some(Arc::new(
                ClassifierSieve::new(scope, Arc::clone(extractor))
                    .with_model(model)
                    .with_min_probability(config.min_probability),
            )),
            Err(e) => {
                warn!(sieve = name, error = %e, "Model failed to load, sieve disabled");
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use caevo_domain::{
        Classifier, Document, EntityId, Features, ModelError, Relation, TLink,
    };
    use caevo_store::LinkGraph;

    struct NoFeatures;

    impl FeatureExtractor for NoFeatures {
        fn features(&self, _doc: &Document, _id1: &EntityId, _id2: &EntityId) -> Features {
            Features::new()
        }
    }

    struct AlwaysBefore;

    impl Classifier for AlwaysBefore {
        fn classify(&self, _features: &Features) -> Relation {
            Relation::Before
        }

        fn scores(&self, _features: &Features) -> Vec<(Relation, f64)> {
            vec![(Relation::Before, 0.0)]
        }
    }

    /// Only has a model for event/DCT pairs
    struct DctOnlyLoader;

    impl ModelLoader for DctOnlyLoader {
        fn load(&self, name: &str) -> Result<Box<dyn Classifier>, ModelError> {
            if name == "MLEventDCT" {
                Ok(Box::new(AlwaysBefore))
            } else {
                Err(ModelError::NotFound(name.to_string()))
            }
        }
    }

    struct Fixed(&'static str);

    impl Sieve for Fixed {
        fn name(&self) -> &str {
            self.0
        }

        fn annotate(&self, _doc: &Document, _graph: &LinkGraph) -> Result<Vec<TLink>, crate::SieveError> {
            Ok(vec![TLink::new("e1", "e2", Relation::Before)])
        }
    }

    fn config(names: &[&str]) -> PipelineConfig {
        PipelineConfig {
            sieves: names.iter().map(|s| s.to_string()).collect(),
            ..Default::default()
        }
    }

    fn names(sieves: &[Arc<dyn Sieve>]) -> Vec<String> {
        sieves.iter().map(|s| s.name().to_string()).collect()
    }

    #[test]
    fn test_rule_sieves_in_order() {
        let sieves = SieveRegistry::new()
            .build(&config(&["AllVagueSieve", "TimeTimeSieve", "RepCreationDay"]))
            .unwrap();
        assert_eq!(names(&sieves), vec!["AllVagueSieve", "TimeTimeSieve", "RepCreationDay"]);
    }

    #[test]
    fn test_unknown_sieve() {
        let result = SieveRegistry::new().build(&config(&["NoSuchSieve"]));
        assert!(matches!(result, Err(PipelineError::UnknownSieve(name)) if name == "NoSuchSieve"));
    }

    #[test]
    fn test_classifier_without_collaborators_is_disabled() {
        let sieves = SieveRegistry::new()
            .build(&config(&["MLEventDCT", "TimeTimeSieve"]))
            .unwrap();
        assert_eq!(names(&sieves), vec!["TimeTimeSieve"]);
    }

    #[test]
    fn test_classifier_load_failure_is_disabled() {
        let registry = SieveRegistry::new()
            .with_extractor(Arc::new(NoFeatures))
            .with_loader(Arc::new(DctOnlyLoader));
        let sieves = registry
            .build(&config(&["MLEventDCT", "MLEventEventSameSent"]))
            .unwrap();
        assert_eq!(names(&sieves), vec!["MLEventDCT"]);
    }

    #[test]
    fn test_custom_sieve_shadows_builtin() {
        let mut registry = SieveRegistry::new();
        registry.register(Arc::new(Fixed("TimeTimeSieve")));
        let sieves = registry.build(&config(&["TimeTimeSieve"])).unwrap();
        let links = sieves[0]
            .annotate(&Document::new("d", 0), &LinkGraph::new())
            .unwrap();
        assert_eq!(links.len(), 1);
    }
}
