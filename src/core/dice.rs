//! Die templates and rolled dice

use crate::core::DieId;
use rand::Rng;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

/// Immutable catalog entry describing a die
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DieTemplate {
    /// Catalog key (e.g., "d6")
    pub key: String,

    /// Face values, in face order
    pub faces: SmallVec<[i32; 6]>,

    /// Opaque visual ids, one per face (may be empty)
    #[serde(default)]
    pub images: Vec<String>,
}

impl DieTemplate {
    pub fn new(key: impl Into<String>, faces: &[i32]) -> Self {
        DieTemplate {
            key: key.into(),
            faces: SmallVec::from_slice(faces),
            images: Vec::new(),
        }
    }

    /// Roll this template into a live die
    ///
    /// Every face is equally likely. A template without faces rolls 0.
    pub fn roll(&self, id: DieId, rng: &mut impl Rng) -> Die {
        let (face, value) = if self.faces.is_empty() {
            (0, 0)
        } else {
            let face = rng.gen_range(0..self.faces.len());
            (face, self.faces[face])
        };

        Die {
            id,
            value,
            face,
            template: self.key.clone(),
        }
    }

    /// Mean face value, used by controllers to rank templates
    pub fn mean_value(&self) -> f64 {
        if self.faces.is_empty() {
            return 0.0;
        }
        self.faces.iter().map(|&v| v as f64).sum::<f64>() / self.faces.len() as f64
    }

    /// Visual id for a face, if the template has one
    pub fn image(&self, face: usize) -> Option<&str> {
        self.images.get(face).map(String::as_str)
    }
}

/// A die in play
///
/// Owned by whichever zone currently holds it; destroyed when consumed
/// by a tile or cleared at the end of the player's turn.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Die {
    pub id: DieId,

    /// Rolled value
    pub value: i32,

    /// Index of the rolled face in the template
    pub face: usize,

    /// Key of the template this die was rolled from
    pub template: String,
}

/// Sum of die values
pub fn sum_dice<'a>(dice: impl IntoIterator<Item = &'a Die>) -> i32 {
    dice.into_iter().map(|d| d.value).sum()
}
