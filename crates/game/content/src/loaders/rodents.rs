//! Squeak catalog loader.
//!
//! Each entry describes one summonable template together with the squeak
//! that places it. Skills name resolvers from the catalog's registry.

use std::path::Path;

use serde::{Deserialize, Serialize};
use squeak_core::{
    EntityTemplate, RodentClass, RodentStats, SkillDescriptor, SkillTags, SqueakKind,
};

use crate::catalog::{Catalog, entity_behavior, squeak_requirement};
use crate::loaders::{LoadResult, read_file};
use crate::squeaks::SummonSqueak;

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SqueakRon {
    name: String,
    #[serde(default)]
    description: String,
    #[serde(default = "rodent_kind")]
    kind: SqueakKind,
    crumb_cost: u32,
    #[serde(default)]
    health: Option<u32>,
    #[serde(default)]
    defense: i32,
    #[serde(default)]
    height: i32,
    #[serde(default)]
    collision: bool,
    #[serde(default)]
    stats: Option<StatsRon>,
    #[serde(default)]
    skills: Vec<SkillRon>,
    #[serde(default)]
    behavior: Option<String>,
    #[serde(default)]
    requirement: Option<String>,
}

fn rodent_kind() -> SqueakKind {
    SqueakKind::Rodent
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct StatsRon {
    class: RodentClass,
    speed: i32,
    attack: i32,
    move_cost: u32,
    move_stamina: u32,
    skill_stamina: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
struct SkillRon {
    name: String,
    crumb_cost: u32,
    resolver: String,
    #[serde(default)]
    reach: Option<u32>,
    #[serde(default)]
    altitude: Option<u32>,
    #[serde(default)]
    tags: SkillTags,
}

/// Loader for squeak catalogs from RON files.
pub struct RodentLoader;

impl RodentLoader {
    /// Load every entry of a RON catalog and add it to `catalog`.
    ///
    /// Returns the names added, in file order. Entries after a failing one
    /// are not added.
    pub fn load(path: &Path, catalog: &mut Catalog) -> LoadResult<Vec<String>> {
        let content = read_file(path)?;
        let entries: Vec<SqueakRon> = ron::from_str(&content)
            .map_err(|e| anyhow::anyhow!("Failed to parse squeak catalog RON: {}", e))?;

        let mut names = Vec::with_capacity(entries.len());
        for entry in entries {
            let name = entry.name.clone();
            let squeak = Self::build(entry, catalog)
                .map_err(|e| anyhow::anyhow!("Failed to build squeak '{}': {}", name, e))?;
            catalog.insert_template(squeak.template().clone())?;
            catalog.insert_squeak(squeak)?;
            names.push(name);
        }
        Ok(names)
    }

    fn build(entry: SqueakRon, catalog: &Catalog) -> LoadResult<SummonSqueak> {
        if entry.kind == SqueakKind::Rodent && entry.stats.is_none() {
            anyhow::bail!("rodent squeaks need stats");
        }

        let mut builder = EntityTemplate::builder(entry.name)
            .description(entry.description)
            .defense(entry.defense)
            .height(entry.height)
            .collision(entry.collision);
        if let Some(health) = entry.health {
            builder = builder.health(health);
        }
        if let Some(stats) = entry.stats {
            builder = builder.rodent(RodentStats::new(
                stats.class,
                stats.speed,
                stats.attack,
                stats.move_cost,
                stats.move_stamina,
                stats.skill_stamina,
            ));
        }
        if let Some(name) = entry.behavior {
            let behavior = entity_behavior(&name)
                .ok_or_else(|| anyhow::anyhow!("unknown behavior '{}'", name))?;
            builder = builder.behavior(behavior);
        }
        for skill in entry.skills {
            let mut descriptor = SkillDescriptor::new(skill.name, skill.crumb_cost)
                .with_tags(skill.tags);
            descriptor.reach = skill.reach;
            descriptor.altitude = skill.altitude;
            builder = builder.skill(descriptor, skill.resolver);
        }
        let template = builder.build(catalog.registry())?;

        let squeak = match entry.kind {
            SqueakKind::Rodent => SummonSqueak::rodent(template, entry.crumb_cost),
            SqueakKind::Trick => SummonSqueak::trick(template, entry.crumb_cost),
        };
        match entry.requirement {
            Some(name) => {
                let ready = squeak_requirement(&name)
                    .ok_or_else(|| anyhow::anyhow!("unknown requirement '{}'", name))?;
                Ok(squeak.with_requirement(ready))
            }
            None => Ok(squeak),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use squeak_core::Squeak;
    use tempfile::TempDir;

    use super::*;
    use crate::catalog::default_registry;

    const SQUEAKS: &str = r#"[
        (
            name: "Scout",
            description: "Runs ahead.",
            crumb_cost: 5,
            health: Some(4),
            defense: 1,
            stats: (class: Vanguard, speed: 6, attack: 2, move_cost: 1, move_stamina: 2, skill_stamina: 1),
            skills: [
                (name: "Nibble", crumb_cost: 2, resolver: "stab", reach: Some(1), altitude: Some(0)),
                (name: "Patch", crumb_cost: 4, resolver: "my_heart", reach: Some(1),
                    tags: "SUPPORT | NO_TARGET_FEATURE"),
            ],
            behavior: Some("escape_maneuver"),
        ),
        (
            name: "Bell",
            kind: Trick,
            crumb_cost: 12,
            health: Some(3),
            collision: true,
            behavior: Some("sundial"),
            requirement: Some("lairs_not_spent"),
        ),
    ]"#;

    #[test]
    fn loads_rodents_and_tricks_into_the_catalog() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rodents.ron");
        fs::write(&path, SQUEAKS).unwrap();

        let mut catalog = Catalog::new(default_registry().unwrap());
        let names = RodentLoader::load(&path, &mut catalog).unwrap();
        assert_eq!(names, ["Scout", "Bell"]);

        let scout = catalog.template("Scout").unwrap();
        assert_eq!(scout.health(), Some(4));
        assert_eq!(scout.rodent().map(|stats| stats.speed), Some(6));
        assert_eq!(scout.skills()[0].reach(), Some(1));
        assert_eq!(scout.skills()[0].tags(), SkillTags::empty());
        assert_eq!(
            scout.skills()[1].tags(),
            SkillTags::SUPPORT | SkillTags::NO_TARGET_FEATURE
        );
        assert!(scout.collision());

        let bell = catalog.squeak("Bell").unwrap();
        assert_eq!(bell.kind(), SqueakKind::Trick);
        assert_eq!(bell.crumb_cost(), 12);
    }

    #[test]
    fn unresolved_names_are_reported() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rodents.ron");
        fs::write(
            &path,
            r#"[(name: "Mole", crumb_cost: 1, health: Some(1),
                stats: (class: Tank, speed: 1, attack: 1, move_cost: 1, move_stamina: 1, skill_stamina: 1),
                skills: [(name: "Dig", crumb_cost: 1, resolver: "dig", reach: Some(1))])]"#,
        )
        .unwrap();

        let mut catalog = Catalog::new(default_registry().unwrap());
        let err = RodentLoader::load(&path, &mut catalog).unwrap_err();
        assert!(err.to_string().contains("Mole"));
        assert!(catalog.template("Mole").is_err());
    }

    #[test]
    fn rodents_without_stats_are_rejected() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("rodents.ron");
        fs::write(&path, r#"[(name: "Ghost", crumb_cost: 1)]"#).unwrap();

        let mut catalog = Catalog::new(default_registry().unwrap());
        assert!(RodentLoader::load(&path, &mut catalog).is_err());
    }
}
