//! Converter plugin ABI.
//!
//! A plugin is a shared library exporting one well-known symbol,
//! [`DECLARATION_SYMBOL`], holding a [`PluginDeclaration`]. The host checks
//! the declared ABI version before calling anything else, then lets the
//! plugin register named converter constructors into a
//! [`ConverterRegistrar`]. The converter contract itself
//! ([`Converter`](crate::convert::Converter)) is defined by the host crate
//! and shared with plugins by linking against it, so both sides agree on the
//! trait identity.
//!
//! This crate is its own first plugin: `lib.rs` uses [`declare_converters!`]
//! to export the three built-in renderers, and the resulting cdylib can be
//! handed to the driver like any external plugin.

pub mod loader;

pub use loader::{LoadedConverter, load_converter};

use std::collections::HashMap;

use crate::convert::Converter;
use crate::error::{Error, Result};

/// ABI version of the plugin declaration. Bumped on any breaking change to
/// the declaration layout or the converter contract.
pub const ABI_VERSION: u32 = 1;

/// Exported symbol name every plugin must provide.
pub const DECLARATION_SYMBOL: &[u8] = b"converter_plugin_declaration\0";

/// Parameterless construction path for a converter. An `Err` is reported as
/// an instantiation failure, distinct from a resolution failure.
pub type ConverterCtor = fn() -> std::result::Result<Box<dyn Converter>, String>;

/// Receiver for a plugin's converter registrations.
pub trait ConverterRegistrar {
    /// Register a constructor under a qualified name, e.g.
    /// `docshift::markdown`. A later registration under the same name wins.
    fn register(&mut self, name: &str, ctor: ConverterCtor);
}

/// The statically initialized declaration a plugin exports.
#[repr(C)]
pub struct PluginDeclaration {
    pub abi_version: u32,
    pub register: unsafe extern "C" fn(&mut dyn ConverterRegistrar),
}

/// Export a [`PluginDeclaration`] registering the given converters.
///
/// ```ignore
/// docshift::declare_converters! {
///     "my::converter" => my_ctor,
/// }
/// ```
#[macro_export]
macro_rules! declare_converters {
    ($($name:expr => $ctor:expr),+ $(,)?) => {
        #[allow(non_upper_case_globals)]
        #[unsafe(no_mangle)]
        pub static converter_plugin_declaration: $crate::plugin::PluginDeclaration =
            $crate::plugin::PluginDeclaration {
                abi_version: $crate::plugin::ABI_VERSION,
                register: {
                    #[allow(improper_ctypes_definitions)]
                    unsafe extern "C" fn register(
                        registrar: &mut dyn $crate::plugin::ConverterRegistrar,
                    ) {
                        $(registrar.register($name, $ctor);)+
                    }
                    register
                },
            };
    };
}

/// Name-to-constructor map built from plugin registrations.
#[derive(Default)]
pub struct ConverterRegistry {
    converters: HashMap<String, ConverterCtor>,
}

impl ConverterRegistrar for ConverterRegistry {
    fn register(&mut self, name: &str, ctor: ConverterCtor) {
        self.converters.insert(name.to_string(), ctor);
    }
}

impl ConverterRegistry {
    pub fn contains(&self, name: &str) -> bool {
        self.converters.contains_key(name)
    }

    /// Registered names, sorted for stable listings.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.converters.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    /// Resolve a name and run its constructor.
    pub fn instantiate(&self, name: &str) -> Result<Box<dyn Converter>> {
        let ctor = self
            .converters
            .get(name)
            .ok_or_else(|| Error::NotFound(name.to_string()))?;
        ctor().map_err(Error::Instantiation)
    }
}

/// The host's own converters, registered through the same declaration the
/// cdylib exports. Lets callers and tests exercise resolution and
/// instantiation without loading a shared library.
pub fn builtin_registry() -> ConverterRegistry {
    let mut registry = ConverterRegistry::default();
    // Safe to call: the declaration is ours and registers plain functions.
    unsafe { (crate::converter_plugin_declaration.register)(&mut registry) };
    registry
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_builtin_registry_names() {
        let registry = builtin_registry();
        assert_eq!(
            registry.names(),
            vec!["docshift::ascii", "docshift::markdown", "docshift::toc_json"]
        );
    }

    #[test]
    fn test_builtin_declaration_abi_version() {
        assert_eq!(crate::converter_plugin_declaration.abi_version, ABI_VERSION);
    }

    #[test]
    fn test_instantiate_unknown_name() {
        let registry = builtin_registry();
        let err = registry.instantiate("docshift::nonexistent").err().unwrap();
        assert!(matches!(err, Error::NotFound(_)));
        assert_eq!(err.exit_code(), 6);
    }

    #[test]
    fn test_instantiate_failure_is_distinct() {
        fn failing_ctor() -> std::result::Result<Box<dyn Converter>, String> {
            Err("construction refused".to_string())
        }

        let mut registry = ConverterRegistry::default();
        registry.register("broken", failing_ctor);

        let err = registry.instantiate("broken").err().unwrap();
        assert!(matches!(err, Error::Instantiation(_)));
        assert_eq!(err.exit_code(), 7);
    }

    #[test]
    fn test_later_registration_wins() {
        fn failing_ctor() -> std::result::Result<Box<dyn Converter>, String> {
            Err("old".to_string())
        }
        fn working_ctor() -> std::result::Result<Box<dyn Converter>, String> {
            Ok(Box::new(crate::convert::AsciiConverter::new()))
        }

        let mut registry = ConverterRegistry::default();
        registry.register("x", failing_ctor);
        registry.register("x", working_ctor);
        assert!(registry.instantiate("x").is_ok());
    }
}
