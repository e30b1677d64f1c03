//! Expert registry keyed by chat id.
//!
//! Experts arrive through a chat frontend and are identified there by a
//! chat id. The directory maps chat ids to [`Expert`] profiles, handing
//! out small sequential expert ids on first contact. Profile edits go
//! through the validation layer so a bad name or weekday list never
//! lands in a profile.

use std::collections::btree_map::Entry;
use std::collections::BTreeMap;

use log::info;
use serde::{Deserialize, Serialize};

use crate::models::{Expert, Weekday};
use crate::validation::{parse_weekdays, validate_name, ValidationError};

/// Registry of known experts, keyed by chat id.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExpertDirectory {
    experts: BTreeMap<i64, Expert>,
    next_id: u32,
}

impl Default for ExpertDirectory {
    fn default() -> Self {
        Self {
            experts: BTreeMap::new(),
            next_id: 1,
        }
    }
}

impl ExpertDirectory {
    /// Creates an empty directory. Expert ids start at 1.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the expert for a chat, registering a new one on first
    /// contact.
    ///
    /// A new expert gets the next sequential id and a placeholder name
    /// until [`rename`](Self::rename) sets a real one.
    pub fn get_or_create(&mut self, chat_id: i64) -> &mut Expert {
        match self.experts.entry(chat_id) {
            Entry::Occupied(entry) => entry.into_mut(),
            Entry::Vacant(entry) => {
                let id = self.next_id;
                self.next_id += 1;
                info!("registering expert {id} for chat {chat_id}");
                entry.insert(Expert::new(id, format!("Expert {id}")).with_chat_id(chat_id))
            }
        }
    }

    /// Looks up the expert for a chat.
    pub fn get(&self, chat_id: i64) -> Option<&Expert> {
        self.experts.get(&chat_id)
    }

    /// Looks up the expert for a chat, mutable.
    pub fn get_mut(&mut self, chat_id: i64) -> Option<&mut Expert> {
        self.experts.get_mut(&chat_id)
    }

    /// Looks up an expert by expert id.
    pub fn by_id(&self, expert_id: u32) -> Option<&Expert> {
        self.experts.values().find(|e| e.id == expert_id)
    }

    /// All registered experts, ordered by chat id.
    pub fn all(&self) -> Vec<&Expert> {
        self.experts.values().collect()
    }

    /// Removes the expert for a chat. Returns whether one was present.
    pub fn remove(&mut self, chat_id: i64) -> bool {
        let removed = self.experts.remove(&chat_id);
        if let Some(expert) = &removed {
            info!("removed expert {} (chat {chat_id})", expert.id);
        }
        removed.is_some()
    }

    /// Number of registered experts.
    pub fn len(&self) -> usize {
        self.experts.len()
    }

    /// Whether the directory is empty.
    pub fn is_empty(&self) -> bool {
        self.experts.is_empty()
    }

    /// Renames the expert for a chat, registering it first if needed.
    ///
    /// The name is validated and trimmed; on error nothing changes.
    pub fn rename(&mut self, chat_id: i64, name: &str) -> Result<(), ValidationError> {
        let trimmed = validate_name(name)?;
        let expert = self.get_or_create(chat_id);
        info!("renaming expert {} to {trimmed:?}", expert.id);
        expert.name = trimmed;
        Ok(())
    }

    /// Sets preferred weekdays from a token list like `"mon, wed, fri"`.
    ///
    /// The whole list is parsed before anything is stored, so one bad
    /// token rejects the input and leaves the profile untouched.
    /// Returns the parsed weekdays for echoing back to the chat.
    pub fn set_preferences(
        &mut self,
        chat_id: i64,
        input: &str,
    ) -> Result<Vec<Weekday>, ValidationError> {
        let weekdays = parse_weekdays(input)?;
        let expert = self.get_or_create(chat_id);
        expert.set_preferred_weekdays(weekdays.clone());
        info!("expert {} prefers {:?}", expert.id, expert.preferred_weekdays());
        Ok(weekdays)
    }
}
