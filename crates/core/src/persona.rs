//! The three fixed critique personas the model is asked to role-play.
//!
//! The three-persona cardinality is a hard contract: the prompt builder
//! asks for exactly these identities and the normalizer rejects any
//! result set that does not contain each of them exactly once.

use serde::{Deserialize, Serialize};

/// A critique personality.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Persona {
    /// Rigorous, professional fashion critic ("La Directora").
    Editor,
    /// Trend-focused Gen Z enthusiast ("El Cool").
    Hypebeast,
    /// Warm, informal stylist ("Amiga Boho").
    Boho,
}

impl Persona {
    /// All personas, in prompt order.
    pub const ALL: [Persona; 3] = [Persona::Editor, Persona::Hypebeast, Persona::Boho];

    /// Stable lowercase identifier used on the wire and in the database.
    pub fn id(self) -> &'static str {
        match self {
            Persona::Editor => "editor",
            Persona::Hypebeast => "hypebeast",
            Persona::Boho => "boho",
        }
    }

    /// Display name shown to end users.
    pub fn display_name(self) -> &'static str {
        match self {
            Persona::Editor => "La Directora",
            Persona::Hypebeast => "El Cool",
            Persona::Boho => "Amiga Boho",
        }
    }

    /// Behavioral instruction block embedded verbatim in the prompt.
    pub fn instruction(self) -> &'static str {
        match self {
            Persona::Editor => {
                "You are a ruthless fashion editor (La Directora). You care about \
                 proportions, tailoring, and fabric quality. Use professional \
                 terminology like 'silhouette', 'color palette', 'textural contrast', \
                 and 'composition'. Your tone is professional and sophisticated."
            }
            Persona::Hypebeast => {
                "You are a Gen Z trend scout (El Cool). You care about silhouette, \
                 brand relevance, and 'vibes'. Use slang like 'fit', 'flex', 'drip', \
                 'grail', 'clean'. Focus on brand synergy and street credibility."
            }
            Persona::Boho => {
                "You are a warm, free-spirited stylist (Amiga Boho). You love \
                 textures, layers, and earth tones. Talk like a supportive but honest \
                 best friend. Use emojis and be very encouraging but direct about \
                 what's not working."
            }
        }
    }

    /// Parse a wire identifier back into a persona.
    pub fn from_id(id: &str) -> Option<Persona> {
        match id {
            "editor" => Some(Persona::Editor),
            "hypebeast" => Some(Persona::Hypebeast),
            "boho" => Some(Persona::Boho),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_round_trip() {
        for persona in Persona::ALL {
            assert_eq!(Persona::from_id(persona.id()), Some(persona));
        }
        assert_eq!(Persona::from_id("influencer"), None);
    }

    #[test]
    fn serde_uses_lowercase_ids() {
        assert_eq!(
            serde_json::to_string(&Persona::Hypebeast).unwrap(),
            "\"hypebeast\""
        );
        let parsed: Persona = serde_json::from_str("\"boho\"").unwrap();
        assert_eq!(parsed, Persona::Boho);
    }

    #[test]
    fn instructions_are_distinct() {
        assert_ne!(Persona::Editor.instruction(), Persona::Hypebeast.instruction());
        assert_ne!(Persona::Hypebeast.instruction(), Persona::Boho.instruction());
    }
}
