//! Mixins: named slots of shared configuration a template opts into.
//!
//! A template never reads the [`ConfigurationContext`] directly. It declares
//! the slots it consumes, the driver injects their values, and both the
//! defaulting hook and the renderer see only what was declared.

use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use crate::domain::{
    config::{ConfigurationContext, is_identifier},
    error::{DomainError, DomainResult},
};

/// A capability a template can require.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum MixinSlot {
    /// License/header text, bound as `Boilerplate`.
    Boilerplate,
    /// Module or import root of the generated project, bound as `Repo`.
    Repository,
    /// Name of the generated project, bound as `ProjectName`.
    ProjectName,
    /// An extra named variable the template cannot do without.
    Variable(String),
}

impl MixinSlot {
    /// Name the slot's value is bound to inside `{{ .Name }}`.
    pub fn placeholder(&self) -> &str {
        match self {
            Self::Boilerplate => "Boilerplate",
            Self::Repository => "Repo",
            Self::ProjectName => "ProjectName",
            Self::Variable(name) => name,
        }
    }
}

impl fmt::Display for MixinSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.placeholder())
    }
}

/// Parses the bound name back into a slot. `Repository` is accepted as an
/// alias of `Repo`; any other identifier becomes a [`MixinSlot::Variable`].
impl FromStr for MixinSlot {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim() {
            "Boilerplate" => Ok(Self::Boilerplate),
            "Repo" | "Repository" => Ok(Self::Repository),
            "ProjectName" => Ok(Self::ProjectName),
            name if is_identifier(name) => Ok(Self::Variable(name.to_string())),
            other => Err(DomainError::InvalidConfiguration {
                field: "slot".into(),
                reason: format!("'{other}' is not a valid slot name"),
            }),
        }
    }
}

/// The set of slots a template declared, with their injected values.
///
/// Declaration order carries no meaning; slots are kept sorted.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MixinSet {
    slots: BTreeMap<MixinSlot, Option<String>>,
}

impl MixinSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a set from a list of slots.
    ///
    /// # Errors
    ///
    /// `DuplicateSlot` if the same slot appears twice.
    pub fn from_slots(slots: impl IntoIterator<Item = MixinSlot>) -> DomainResult<Self> {
        let mut set = Self::new();
        for slot in slots {
            set.declare(slot)?;
        }
        Ok(set)
    }

    /// Declare one more slot.
    pub fn declare(&mut self, slot: MixinSlot) -> DomainResult<()> {
        if self.slots.contains_key(&slot) {
            return Err(DomainError::DuplicateSlot {
                slot: slot.to_string(),
            });
        }
        self.slots.insert(slot, None);
        Ok(())
    }

    pub fn contains(&self, slot: &MixinSlot) -> bool {
        self.slots.contains_key(slot)
    }

    pub fn slots(&self) -> impl Iterator<Item = &MixinSlot> {
        self.slots.keys()
    }

    pub fn len(&self) -> usize {
        self.slots.len()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.is_empty()
    }

    /// Copy every declared slot's value out of the context.
    ///
    /// A slot the context has no value for keeps whatever it held before,
    /// which is `None` unless the author called [`MixinSet::set`].
    pub fn inject(&mut self, context: &ConfigurationContext) {
        for (slot, value) in self.slots.iter_mut() {
            if let Some(v) = context.slot_value(slot) {
                *value = Some(v.to_string());
            }
        }
    }

    /// Set a declared slot's value by hand.
    pub fn set(&mut self, slot: &MixinSlot, value: impl Into<String>) -> DomainResult<()> {
        match self.slots.get_mut(slot) {
            Some(entry) => {
                *entry = Some(value.into());
                Ok(())
            }
            None => Err(DomainError::UndeclaredSlot {
                slot: slot.to_string(),
            }),
        }
    }

    pub fn value(&self, slot: &MixinSlot) -> Option<&str> {
        self.slots.get(slot).and_then(|v| v.as_deref())
    }

    /// The value of a slot a defaulting hook depends on.
    ///
    /// # Errors
    ///
    /// `Configuration` naming `template` and the slot when it is unset or
    /// was never declared.
    pub fn require(&self, template: &str, slot: &MixinSlot) -> DomainResult<&str> {
        self.value(slot).ok_or_else(|| DomainError::Configuration {
            template: template.to_string(),
            slot: slot.to_string(),
        })
    }

    /// Fail on the first declared slot that has no value.
    pub fn require_all(&self, template: &str) -> DomainResult<()> {
        for slot in self.slots.keys() {
            self.require(template, slot)?;
        }
        Ok(())
    }

    /// Resolve a placeholder name against the declared, set slots.
    pub fn binding(&self, name: &str) -> Option<&str> {
        self.slots
            .iter()
            .find(|(slot, _)| slot.placeholder() == name)
            .and_then(|(_, value)| value.as_deref())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn context() -> ConfigurationContext {
        ConfigurationContext::builder()
            .project_name("demo")
            .repository("example.com/demo")
            .boilerplate("// header")
            .variable("Domain", "example.com")
            .build()
            .unwrap()
    }

    #[test]
    fn duplicate_declaration_is_rejected() {
        let err = MixinSet::from_slots([MixinSlot::Repository, MixinSlot::Repository]).unwrap_err();
        assert_eq!(err, DomainError::DuplicateSlot { slot: "Repo".into() });
    }

    #[test]
    fn injection_fills_only_declared_slots() {
        let mut set = MixinSet::from_slots([MixinSlot::ProjectName]).unwrap();
        set.inject(&context());

        assert_eq!(set.value(&MixinSlot::ProjectName), Some("demo"));
        assert_eq!(set.value(&MixinSlot::Repository), None);
        assert_eq!(set.binding("ProjectName"), Some("demo"));
        assert_eq!(set.binding("Repo"), None);
    }

    #[test]
    fn variable_slot_missing_from_context_stays_unset() {
        let mut set = MixinSet::from_slots([
            MixinSlot::Boilerplate,
            MixinSlot::Variable("Owner".into()),
        ])
        .unwrap();
        set.inject(&context());

        let err = set.require_all("api-types").unwrap_err();
        assert_eq!(
            err,
            DomainError::Configuration {
                template: "api-types".into(),
                slot: "Owner".into()
            }
        );
    }

    #[test]
    fn variable_slot_binds_under_its_own_name() {
        let mut set = MixinSet::from_slots([MixinSlot::Variable("Domain".into())]).unwrap();
        set.inject(&context());
        assert_eq!(set.binding("Domain"), Some("example.com"));
        assert!(set.require_all("t").is_ok());
    }

    #[test]
    fn set_requires_declaration() {
        let mut set = MixinSet::new();
        assert!(matches!(
            set.set(&MixinSlot::ProjectName, "x"),
            Err(DomainError::UndeclaredSlot { .. })
        ));
    }

    #[test]
    fn manual_value_survives_injection_when_context_lacks_it() {
        let owner = MixinSlot::Variable("Owner".into());
        let mut set = MixinSet::from_slots([owner.clone()]).unwrap();
        set.set(&owner, "platform-team").unwrap();
        set.inject(&context());
        assert_eq!(set.value(&owner), Some("platform-team"));
    }

    #[test]
    fn slot_names_parse_back() {
        assert_eq!("Repo".parse::<MixinSlot>().unwrap(), MixinSlot::Repository);
        assert_eq!("Repository".parse::<MixinSlot>().unwrap(), MixinSlot::Repository);
        assert_eq!(
            "Owner".parse::<MixinSlot>().unwrap(),
            MixinSlot::Variable("Owner".into())
        );
        assert!("not-a-slot".parse::<MixinSlot>().is_err());
    }
}
