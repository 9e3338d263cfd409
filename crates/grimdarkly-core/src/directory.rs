// ── Faction directory ──
//
// Merges fetched factions with the built-in sub-faction entries and
// produces deep links into a pre-filled unit search.

use serde::Serialize;

use crate::model::Faction;
use crate::search::params::UnitSearchParams;

/// Category label attached to built-in sub-faction entries.
pub const SUB_FACTION_CATEGORY: &str = "Subfaction";

const SUB_FACTION_PARENT: &str = "Space Marines";

/// Chapters that narrow the Space Marines without being first-class factions.
/// Ids sit above the range the API hands out.
const SUB_FACTIONS: &[(u32, &str)] = &[
    (1001, "Blood Angels"),
    (1002, "Dark Angels"),
    (1003, "Ultramarines"),
    (1004, "Space Wolves"),
    (1005, "Iron Hands"),
    (1006, "White Scars"),
    (1007, "Raven Guard"),
    (1008, "Salamanders"),
    (1009, "Imperial Fists"),
];

/// Lore blurbs, first match wins. A blurb applies when the normalized
/// faction name contains every listed fragment.
const DESCRIPTIONS: &[(&[&str], &str)] = &[
    (&["emperor", "children"], "Slaanesh's perfectionist followers, seeking ever-greater sensations and aesthetic beauty in all things."),
    (&["au empire"], "A young and rapidly expanding empire that seeks to unite all races under the Greater Good through diplomacy and technology."),
    (&["adepta", "sororitas"], "The militant arm of the Ecclesiarchy, wielding faith as their greatest weapon against the enemies of the Emperor."),
    (&["adeptus", "custodes"], "The Emperor's personal bodyguards, genetically enhanced super-soldiers who are the pinnacle of human perfection."),
    (&["adeptus", "mechanicus"], "The tech-priests of Mars, masters of ancient technology and cybernetic augmentation in service to the Omnissiah."),
    (&["adeptus", "titanicus"], "Pilots of the mighty God-Machines, commanding colossal war engines that can level entire cities."),
    (&["aeldari"], "The ancient and graceful space elves, masters of psychic powers and advanced technology from a fallen empire."),
    (&["astra", "militarum"], "The vast armies of the Imperium, countless billions of brave soldiers holding the line against all threats."),
    (&["chaos", "daemons"], "Malevolent entities from the Warp, manifestations of the Dark Gods' will and pure embodiments of corruption."),
    (&["chaos", "knights"], "Noble houses corrupted by Chaos, piloting massive war machines in service to the Ruinous Powers."),
    (&["chaos", "space", "marines"], "Traitor Astartes who have turned from the Emperor's light, embracing the dark gifts of Chaos."),
    (&["death", "guard"], "Nurgle's chosen warriors, spreading plague and decay while remaining unnaturally resilient to all harm."),
    (&["drukhari"], "The dark kin of the Aeldari, sadistic raiders who feed on the suffering of others to stave off their own damnation."),
    (&["genestealer", "cults"], "Hidden infiltrators working to prepare worlds for the coming of the Great Devourer through subversion and mutation."),
    (&["grey", "knights"], "The Emperor's daemon-hunting specialists, incorruptible warriors dedicated to purging the galaxy of Chaos."),
    (&["imperial", "agents"], "The diverse operatives of the Inquisition and other Imperial organizations, working in the shadows to protect humanity."),
    (&["imperial", "knights"], "Noble houses piloting towering war machines, bound by ancient oaths to defend their worlds and the Imperium."),
    (&["leagues", "votann"], "The Kin, ancient space dwarves who mine the galaxy's riches while maintaining their independence from the Imperium."),
    (&["necrons"], "Ancient robotic warriors who ruled the galaxy eons ago, now awakening from their tomb worlds to reclaim their empire."),
    (&["orks"], "Brutal and warlike creatures who live for battle, growing stronger through combat and spreading across the galaxy."),
    (&["space", "marines"], "The Adeptus Astartes are the Emperor's finest warriors, genetically enhanced super-soldiers who are humanity's greatest defenders."),
    (&["thousand", "sons"], "Tzeentch's scholarly followers, masters of sorcery and mutation who seek to unlock the universe's greatest secrets."),
    (&["tyranids"], "The Great Devourer, an endless swarm of bio-engineered horrors that consumes all life in its path across the galaxy."),
    (&["unaligned", "forces"], "Independent factions and mercenaries who operate outside the major galactic powers, serving their own interests."),
    (&["world", "eaters"], "Khorne's bloodthirsty berserkers, lost to the rage of the Blood God and seeking only to spill blood in his name."),
    (&["blood", "angels"], "A subfaction of the Adeptus Astartes, the Blood Angels are noble warriors cursed with the Red Thirst and Black Rage, fighting with unmatched ferocity and artistic grace."),
    (&["dark", "angels"], "A subfaction of the Adeptus Astartes, the Dark Angels are secretive and mysterious, guarding ancient secrets and hunting the Fallen with relentless determination."),
    (&["ultramarines"], "A subfaction of the Adeptus Astartes, the Ultramarines are the most disciplined and organized of all Space Marine Chapters, following the Codex Astartes with unwavering devotion."),
    (&["space", "wolves"], "A subfaction of the Adeptus Astartes, the Space Wolves are fierce warriors from Fenris who embrace their savage nature and fight with berserker fury."),
    (&["iron", "hands"], "A subfaction of the Adeptus Astartes, the Iron Hands are masters of technology and cybernetics, replacing flesh with metal in their quest for perfection."),
    (&["white", "scars"], "A subfaction of the Adeptus Astartes, the White Scars are swift and mobile warriors who excel at hit-and-run tactics and lightning-fast strikes."),
    (&["raven", "guard"], "A subfaction of the Adeptus Astartes, the Raven Guard are masters of stealth and infiltration, striking from the shadows with surgical precision."),
    (&["salamanders"], "A subfaction of the Adeptus Astartes, the Salamanders are noble warriors who forge their own weapons and protect the innocent with unwavering compassion."),
    (&["imperial", "fists"], "A subfaction of the Adeptus Astartes, the Imperial Fists are master defenders and siege specialists, known for their unbreakable resolve and fortification expertise."),
];

/// Short lore blurb for a faction or sub-faction name.
///
/// Matching ignores case and apostrophes, so "T'au Empire" and
/// "Emperor’s Children" resolve. Unknown names get a generic line.
pub fn faction_description(name: &str) -> String {
    let normalized: String = name
        .chars()
        .filter(|c| !matches!(c, '\'' | '\u{2019}'))
        .collect::<String>()
        .to_lowercase();
    DESCRIPTIONS
        .iter()
        .find(|(fragments, _)| fragments.iter().all(|f| normalized.contains(f)))
        .map_or_else(
            || format!("Explore units, weapons, and abilities for the {name} faction."),
            |(_, blurb)| (*blurb).to_owned(),
        )
}

/// One row of the faction listing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FactionEntry {
    pub id: u32,
    pub name: String,
    pub category: String,
    /// Set for sub-faction entries.
    pub parent: Option<String>,
    pub description: String,
}

impl FactionEntry {
    pub fn is_sub_faction(&self) -> bool {
        self.parent.is_some()
    }

    /// Query string opening a unit search filtered to this faction.
    ///
    /// Sub-factions filter by their parent and carry the chapter as a keyword.
    pub fn units_query(&self) -> String {
        let params = match &self.parent {
            Some(parent) => UnitSearchParams {
                faction: Some(parent.clone()),
                keywords: vec![self.name.clone()],
                ..UnitSearchParams::default()
            },
            None => UnitSearchParams {
                faction: Some(self.name.clone()),
                ..UnitSearchParams::default()
            },
        };
        params.to_query_string()
    }
}

impl From<&Faction> for FactionEntry {
    fn from(f: &Faction) -> Self {
        Self {
            id: f.id,
            name: f.name.clone(),
            category: f.category.name.clone(),
            parent: None,
            description: faction_description(&f.name),
        }
    }
}

/// Whether `name` is one of the built-in sub-factions (case-insensitive).
pub fn is_sub_faction_name(name: &str) -> bool {
    SUB_FACTIONS
        .iter()
        .any(|(_, sub)| sub.eq_ignore_ascii_case(name.trim()))
}

fn built_in_entries() -> impl Iterator<Item = FactionEntry> {
    SUB_FACTIONS.iter().map(|&(id, name)| FactionEntry {
        id,
        name: name.to_owned(),
        category: SUB_FACTION_CATEGORY.to_owned(),
        parent: Some(SUB_FACTION_PARENT.to_owned()),
        description: faction_description(name),
    })
}

/// Build the faction listing, ordered by name.
///
/// Built-in sub-factions are included only when variant content is shown;
/// a fetched faction with the same name wins over the built-in entry.
pub fn faction_directory(fetched: &[Faction], show_variants: bool) -> Vec<FactionEntry> {
    let mut entries: Vec<FactionEntry> = fetched.iter().map(FactionEntry::from).collect();

    if show_variants {
        let extra: Vec<FactionEntry> = built_in_entries()
            .filter(|b| !entries.iter().any(|e| e.name.eq_ignore_ascii_case(&b.name)))
            .collect();
        entries.extend(extra);
    }

    entries.sort_by(|a, b| {
        a.name
            .to_lowercase()
            .cmp(&b.name.to_lowercase())
            .then_with(|| a.name.cmp(&b.name))
    });
    entries
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use crate::model::Category;

    fn faction(id: u32, name: &str) -> Faction {
        Faction {
            id,
            name: name.into(),
            category: Category {
                id: 1,
                name: "Imperium".into(),
            },
        }
    }

    #[test]
    fn variants_are_merged_and_sorted() {
        let fetched = vec![faction(2, "Space Marines"), faction(1, "Adeptus Custodes")];
        let dir = faction_directory(&fetched, true);
        assert_eq!(dir.len(), 11);
        assert_eq!(dir[0].name, "Adeptus Custodes");
        assert_eq!(dir[1].name, "Blood Angels");
        assert!(dir[1].is_sub_faction());
        let names: Vec<&str> = dir.iter().map(|e| e.name.as_str()).collect();
        let mut sorted = names.clone();
        sorted.sort_by_key(|n| n.to_lowercase());
        assert_eq!(names, sorted);
    }

    #[test]
    fn variants_hidden() {
        let fetched = vec![faction(2, "Space Marines")];
        let dir = faction_directory(&fetched, false);
        assert_eq!(dir.len(), 1);
        assert!(!dir[0].is_sub_faction());
    }

    #[test]
    fn fetched_faction_shadows_built_in() {
        let fetched = vec![faction(40, "Blood Angels")];
        let dir = faction_directory(&fetched, true);
        let blood: Vec<_> = dir.iter().filter(|e| e.name == "Blood Angels").collect();
        assert_eq!(blood.len(), 1);
        assert_eq!(blood[0].id, 40);
    }

    #[test]
    fn descriptions_match_normalized_names() {
        assert!(faction_description("T'au Empire").contains("Greater Good"));
        assert!(faction_description("Emperor\u{2019}s Children").starts_with("Slaanesh"));
        assert!(faction_description("Chaos Space Marines").starts_with("Traitor Astartes"));
        assert!(faction_description("Space Marines").starts_with("The Adeptus Astartes"));
        assert!(faction_description("Chaos Knights").contains("corrupted by Chaos"));
        assert_eq!(
            faction_description("Squats"),
            "Explore units, weapons, and abilities for the Squats faction."
        );
    }

    #[test]
    fn entries_carry_descriptions() {
        let dir = faction_directory(&[faction(9, "Orks")], true);
        let orks = dir.iter().find(|e| e.name == "Orks").unwrap();
        assert!(orks.description.starts_with("Brutal and warlike"));
        let wolves = dir.iter().find(|e| e.name == "Space Wolves").unwrap();
        assert!(wolves.description.contains("Fenris"));
    }

    #[test]
    fn deep_links() {
        let orks = FactionEntry::from(&faction(3, "Orks"));
        assert_eq!(orks.units_query(), "?faction=Orks");

        let dir = faction_directory(&[], true);
        let ultra = dir.iter().find(|e| e.name == "Ultramarines").map(FactionEntry::units_query);
        assert_eq!(
            ultra.as_deref(),
            Some("?faction=Space+Marines&keyword=Ultramarines")
        );
    }
}
