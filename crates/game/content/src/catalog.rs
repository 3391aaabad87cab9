//! Name-keyed lookup over every template and squeak the content crate ships.

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use squeak_core::{
    EngineError, EngineResult, EntityBehavior, EntityTemplate, FeatureBehavior, GameManager,
    SkillRegistry, Squeak,
};

use crate::deck::SqueakSetDeck;
use crate::features::{CrumbsStack, DeploymentZone, Lair};
use crate::rodents::{self, cracker, mayo, quartermaster, ratbert_brewbelly, tail_blazer};
use crate::squeaks::SummonSqueak;
use crate::tricks;

/// Registry with every built-in resolver.
pub fn default_registry() -> EngineResult<SkillRegistry> {
    let mut registry = SkillRegistry::new();
    rodents::register_skills(&mut registry)?;
    Ok(registry)
}

/// Entity behavior by its data-file name.
pub fn entity_behavior(name: &str) -> Option<Arc<dyn EntityBehavior>> {
    match name {
        "bread_good" => Some(Arc::new(cracker::BreadGood)),
        "escape_maneuver" => Some(Arc::new(mayo::EscapeManeuver)),
        "sundial" => Some(Arc::new(tricks::SundialBehavior)),
        _ => None,
    }
}

/// Fresh feature behavior by its data-file name.
///
/// Crumb stacks keep per-feature occupancy, so every call builds a new one.
pub fn feature_behavior(name: &str) -> Option<Arc<dyn FeatureBehavior>> {
    match name {
        "lair" => Some(Arc::new(Lair)),
        "deployment_zone" => Some(Arc::new(DeploymentZone)),
        "crumbs_stack" => Some(Arc::new(CrumbsStack)),
        _ => None,
    }
}

/// Placement guard by its data-file name.
pub fn squeak_requirement(name: &str) -> Option<fn(&GameManager) -> bool> {
    match name {
        "lairs_not_spent" => Some(tricks::sundial_ready),
        _ => None,
    }
}

#[derive(Clone)]
pub struct Catalog {
    registry: SkillRegistry,
    templates: BTreeMap<String, EntityTemplate>,
    squeaks: BTreeMap<String, Arc<SummonSqueak>>,
}

impl Catalog {
    /// Empty catalog over `registry`.
    pub fn new(registry: SkillRegistry) -> Self {
        Self {
            registry,
            templates: BTreeMap::new(),
            squeaks: BTreeMap::new(),
        }
    }

    /// Every built-in rodent and trick with its summoning squeak.
    pub fn builtin() -> EngineResult<Self> {
        let mut catalog = Self::new(default_registry()?);
        let registry = catalog.registry.clone();

        let rodent_costs = [
            (tail_blazer::NAME, tail_blazer::CRUMB_COST),
            (cracker::NAME, cracker::CRUMB_COST),
            (quartermaster::NAME, quartermaster::CRUMB_COST),
            (mayo::NAME, mayo::CRUMB_COST),
            (ratbert_brewbelly::NAME, ratbert_brewbelly::CRUMB_COST),
        ];
        for template in rodents::templates(&registry)? {
            let cost = rodent_costs
                .iter()
                .find(|(name, _)| *name == template.name())
                .map(|(_, cost)| *cost)
                .ok_or_else(|| {
                    EngineError::Configuration(format!(
                        "rodent '{}' has no crumb cost",
                        template.name()
                    ))
                })?;
            catalog.insert_squeak(SummonSqueak::rodent(template.clone(), cost))?;
            catalog.insert_template(template)?;
        }

        let sundial = tricks::sundial(&registry)?;
        catalog.insert_squeak(
            SummonSqueak::trick(sundial.clone(), tricks::SUNDIAL_CRUMB_COST)
                .with_requirement(tricks::sundial_ready),
        )?;
        catalog.insert_template(sundial)?;
        Ok(catalog)
    }

    pub fn registry(&self) -> &SkillRegistry {
        &self.registry
    }

    pub fn insert_template(&mut self, template: EntityTemplate) -> EngineResult<()> {
        if self.templates.contains_key(template.name()) {
            return Err(EngineError::Configuration(format!(
                "entity template '{}' defined twice",
                template.name()
            )));
        }
        self.templates.insert(template.name().to_owned(), template);
        Ok(())
    }

    pub fn insert_squeak(&mut self, squeak: SummonSqueak) -> EngineResult<()> {
        if self.squeaks.contains_key(squeak.name()) {
            return Err(EngineError::Configuration(format!(
                "squeak '{}' defined twice",
                squeak.name()
            )));
        }
        self.squeaks.insert(squeak.name().to_owned(), Arc::new(squeak));
        Ok(())
    }

    pub fn template(&self, name: &str) -> EngineResult<&EntityTemplate> {
        self.templates
            .get(name)
            .ok_or_else(|| EngineError::Configuration(format!("unknown entity template '{name}'")))
    }

    pub fn templates(&self) -> impl Iterator<Item = &EntityTemplate> {
        self.templates.values()
    }

    pub fn squeak(&self, name: &str) -> EngineResult<Arc<dyn Squeak>> {
        self.squeaks
            .get(name)
            .map(|squeak| squeak.clone() as Arc<dyn Squeak>)
            .ok_or_else(|| EngineError::Configuration(format!("unknown squeak '{name}'")))
    }

    pub fn squeak_names(&self) -> impl Iterator<Item = &str> {
        self.squeaks.keys().map(String::as_str)
    }

    /// Deck holding `copies` of each named squeak.
    pub fn deck(&self, entries: &[(&str, u32)]) -> EngineResult<SqueakSetDeck> {
        entries
            .iter()
            .try_fold(SqueakSetDeck::new(), |deck, (name, copies)| {
                Ok(deck.with(self.squeak(name)?, *copies))
            })
    }
}

impl fmt::Debug for Catalog {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Catalog")
            .field("resolvers", &self.registry.names().collect::<Vec<_>>())
            .field("templates", &self.templates.keys().collect::<Vec<_>>())
            .field("squeaks", &self.squeaks.keys().collect::<Vec<_>>())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use squeak_core::SqueakKind;

    use super::*;

    #[test]
    fn builtin_catalog_lists_every_summon() {
        let catalog = Catalog::builtin().unwrap();
        let names: Vec<_> = catalog.squeak_names().collect();
        assert_eq!(
            names,
            [
                "Cracker",
                "Mayo",
                "Quartermaster",
                "Ratbert Brewbelly",
                "Sundial",
                "TailBlazer",
            ]
        );

        let sundial = catalog.squeak(tricks::SUNDIAL).unwrap();
        assert_eq!(sundial.kind(), SqueakKind::Trick);
        assert_eq!(sundial.crumb_cost(), 30);
        assert_eq!(catalog.squeak(tail_blazer::NAME).unwrap().crumb_cost(), 7);
        assert_eq!(catalog.squeak(ratbert_brewbelly::NAME).unwrap().crumb_cost(), 19);
        assert!(entity_behavior("escape_maneuver").is_some());
    }

    #[test]
    fn unknown_names_are_configuration_errors() {
        let catalog = Catalog::builtin().unwrap();
        assert!(matches!(
            catalog.template("Hamster"),
            Err(EngineError::Configuration(_))
        ));
        assert!(matches!(
            catalog.deck(&[("TailBlazer", 2), ("Hamster", 1)]),
            Err(EngineError::Configuration(_))
        ));
        assert!(entity_behavior("nap").is_none());
        assert!(feature_behavior("lair").is_some());
    }

    #[test]
    fn duplicates_are_rejected() {
        let mut catalog = Catalog::builtin().unwrap();
        let template = catalog.template(cracker::NAME).unwrap().clone();
        assert!(catalog.insert_template(template).is_err());
    }
}
