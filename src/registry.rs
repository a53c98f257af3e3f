//! The command registry: command names mapped to handlers.

use std::{borrow::Cow, collections::BTreeMap, fmt};

use crate::{
    error::{Error, Result},
    handler::Handler,
};

/// How command names are compared.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum CasePolicy {
    /// Names must match exactly.
    #[default]
    Sensitive,
    /// Names match regardless of ASCII case.
    Insensitive,
}

impl CasePolicy {
    /// Normalize a name into its lookup key.
    fn key<'a>(self, name: &'a str) -> Cow<'a, str> {
        match self {
            Self::Sensitive => Cow::Borrowed(name),
            Self::Insensitive => Cow::Owned(name.to_ascii_lowercase()),
        }
    }
}

/// A command selected for a set of tokens.
#[derive(Debug)]
pub struct Resolved<'r> {
    /// Registered command name.
    pub name: &'r str,
    /// Handler to invoke.
    pub handler: &'r dyn Handler,
    /// Parameters contributed by an alias, placed before the user's parameters.
    pub prefix: &'r [String],
}

/// Registered commands, aliases and the optional default command.
///
/// Built once before dispatch and read-only afterwards.
#[derive(Default)]
pub struct Registry {
    /// Name comparison policy.
    policy: CasePolicy,
    /// Handlers keyed by normalized command name.
    handlers: BTreeMap<String, Box<dyn Handler>>,
    /// Alias expansions keyed by normalized alias name.
    aliases: BTreeMap<String, Vec<String>>,
    /// Normalized name of the default command.
    default: Option<String>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new(policy: CasePolicy) -> Self {
        Self {
            policy,
            ..Self::default()
        }
    }

    /// Register a handler under `name`. Duplicate names are rejected.
    pub fn register(&mut self, name: &str, handler: impl Handler + 'static) -> Result<()> {
        let key = self.policy.key(name).into_owned();
        if self.handlers.contains_key(&key) {
            return Err(Error::DuplicateCommand { name: key });
        }
        self.handlers.insert(key, Box::new(handler));
        Ok(())
    }

    /// Builder-style [`Self::register`].
    pub fn with(mut self, name: &str, handler: impl Handler + 'static) -> Result<Self> {
        self.register(name, handler)?;
        Ok(self)
    }

    /// Select the command run when no command token is given.
    pub fn set_default(&mut self, name: &str) -> Result<()> {
        let key = self.policy.key(name).into_owned();
        if !self.handlers.contains_key(&key) {
            return Err(Error::UnknownDefault { name: key });
        }
        self.default = Some(key);
        Ok(())
    }

    /// Define an alias expanding to a command plus leading parameters.
    ///
    /// The first expansion token must name a registered command. An alias
    /// sharing a command's name is ignored, since commands always win. An
    /// alias that is already defined cannot be redefined.
    pub fn alias(&mut self, name: &str, expansion: Vec<String>) -> Result<()> {
        let key = self.policy.key(name).into_owned();
        let Some(target) = expansion.first() else {
            return Err(Error::InvalidAlias {
                name: key,
                message: "expansion is empty".to_string(),
            });
        };
        if !self.handlers.contains_key(&*self.policy.key(target)) {
            return Err(Error::InvalidAlias {
                message: format!("'{target}' is not a command"),
                name: key,
            });
        }
        if self.handlers.contains_key(&key) {
            tracing::warn!(alias = %key, "alias is shadowed by a command of the same name");
            return Ok(());
        }
        if let Some(existing) = self.aliases.get(&key) {
            return Err(Error::InvalidAlias {
                message: format!("already defined as '{}'", shell_words::join(existing)),
                name: key,
            });
        }
        self.aliases.insert(key, expansion);
        Ok(())
    }

    /// Look up a handler by command name.
    pub fn lookup(&self, name: &str) -> Option<&dyn Handler> {
        self.handlers
            .get(&*self.policy.key(name))
            .map(|handler| &**handler)
    }

    /// Resolve a command token, expanding aliases one level deep.
    pub fn resolve(&self, token: &str) -> Option<Resolved<'_>> {
        let key = self.policy.key(token);
        if let Some((name, handler)) = self.handlers.get_key_value(&*key) {
            return Some(Resolved {
                name,
                handler: &**handler,
                prefix: &[],
            });
        }

        let (target, prefix) = self.aliases.get(&*key)?.split_first()?;
        let (name, handler) = self
            .handlers
            .get_key_value(&*self.policy.key(target))?;
        tracing::debug!(alias = %key, command = %name, "expanded alias");
        Some(Resolved {
            name,
            handler: &**handler,
            prefix,
        })
    }

    /// Resolve the default command, if one is set.
    pub fn resolve_default(&self) -> Option<Resolved<'_>> {
        self.default.as_deref().and_then(|name| self.resolve(name))
    }

    /// Name of the default command, if one is set.
    pub fn default_command(&self) -> Option<&str> {
        self.default.as_deref()
    }

    /// Registered commands in name order.
    pub fn commands(&self) -> impl Iterator<Item = (&str, &dyn Handler)> {
        self.handlers
            .iter()
            .map(|(name, handler)| (name.as_str(), &**handler))
    }

    /// Aliases in name order with their expansions.
    pub fn aliases(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.aliases
            .iter()
            .map(|(name, expansion)| (name.as_str(), expansion.as_slice()))
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("policy", &self.policy)
            .field("commands", &self.handlers.keys().collect::<Vec<_>>())
            .field("aliases", &self.aliases)
            .field("default", &self.default)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::{CasePolicy, Registry};
    use crate::{error::Error, testutil::succeed};

    fn tokens(items: &[&str]) -> Vec<String> {
        items.iter().map(|item| (*item).to_string()).collect()
    }

    #[test]
    fn rejects_duplicate_commands() {
        let mut registry = Registry::new(CasePolicy::Sensitive);
        registry.register("convert", succeed()).expect("first");
        let error = registry.register("convert", succeed()).expect_err("duplicate");
        assert!(matches!(error, Error::DuplicateCommand { ref name } if name == "convert"));
    }

    #[test]
    fn case_policy_controls_lookup() {
        let sensitive = Registry::new(CasePolicy::Sensitive)
            .with("convert", succeed())
            .expect("register");
        assert!(sensitive.lookup("convert").is_some());
        assert!(sensitive.lookup("Convert").is_none());

        let insensitive = Registry::new(CasePolicy::Insensitive)
            .with("Convert", succeed())
            .expect("register");
        assert!(insensitive.lookup("CONVERT").is_some());
        let resolved = insensitive.resolve("cOnVeRt").expect("resolve");
        assert_eq!(resolved.name, "convert");
    }

    #[test]
    fn insensitive_duplicates_collide() {
        let mut registry = Registry::new(CasePolicy::Insensitive);
        registry.register("Help", succeed()).expect("first");
        assert!(registry.register("HELP", succeed()).is_err());
    }

    #[test]
    fn aliases_expand_one_level() {
        let mut registry = Registry::new(CasePolicy::Sensitive)
            .with("convert", succeed())
            .expect("register");
        registry
            .alias("j2y", tokens(&["convert", "--to", "yaml"]))
            .expect("alias");

        let resolved = registry.resolve("j2y").expect("resolve");
        assert_eq!(resolved.name, "convert");
        assert_eq!(resolved.prefix, tokens(&["--to", "yaml"]).as_slice());
        assert!(registry.resolve("y2j").is_none());
    }

    #[test]
    fn alias_must_target_a_command() {
        let mut registry = Registry::new(CasePolicy::Sensitive)
            .with("convert", succeed())
            .expect("register");
        let error = registry
            .alias("chain", tokens(&["j2y"]))
            .expect_err("alias of alias");
        assert!(matches!(error, Error::InvalidAlias { .. }));
        assert!(registry.alias("empty", Vec::new()).is_err());
    }

    #[test]
    fn aliases_cannot_be_redefined() {
        let mut registry = Registry::new(CasePolicy::Sensitive)
            .with("convert", succeed())
            .expect("register")
            .with("help", succeed())
            .expect("register");
        registry.alias("-h", tokens(&["help"])).expect("alias");
        let error = registry
            .alias("-h", tokens(&["convert", "--force"]))
            .expect_err("redefinition");
        assert!(
            matches!(error, Error::InvalidAlias { ref name, ref message }
                if name == "-h" && message.contains("'help'"))
        );
        let resolved = registry.resolve("-h").expect("resolve");
        assert_eq!(resolved.name, "help");
        assert!(resolved.prefix.is_empty());
    }

    #[test]
    fn commands_shadow_aliases() {
        let mut registry = Registry::new(CasePolicy::Sensitive)
            .with("convert", succeed())
            .expect("register")
            .with("help", succeed())
            .expect("register");
        registry
            .alias("help", tokens(&["convert", "--force"]))
            .expect("shadowed alias is ignored");
        let resolved = registry.resolve("help").expect("resolve");
        assert_eq!(resolved.name, "help");
        assert!(resolved.prefix.is_empty());
        assert_eq!(registry.aliases().count(), 0);
    }

    #[test]
    fn default_must_be_registered() {
        let mut registry = Registry::new(CasePolicy::Sensitive)
            .with("help", succeed())
            .expect("register");
        assert!(registry.resolve_default().is_none());
        assert!(matches!(
            registry.set_default("missing"),
            Err(Error::UnknownDefault { .. })
        ));
        registry.set_default("help").expect("default");
        assert_eq!(registry.resolve_default().map(|r| r.name), Some("help"));
    }

    #[test]
    fn lists_commands_in_name_order() {
        let registry = Registry::new(CasePolicy::Sensitive)
            .with("version", succeed())
            .expect("register")
            .with("convert", succeed())
            .expect("register");
        let names: Vec<_> = registry.commands().map(|(name, _)| name).collect();
        assert_eq!(names, ["convert", "version"]);
    }
}
