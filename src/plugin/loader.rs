//! Shared-library converter loading.
//!
//! Resolution is linear with no retries: enumerate candidate libraries from
//! the location (one file, or every shared library in a directory), open
//! each, check the declared ABI version, collect registrations, and stop at
//! the first library that resolves the requested name. The loaded library is
//! owned by the returned [`LoadedConverter`], so it stays mapped for as long
//! as the converter is alive and is released on every exit path, including
//! panics during conversion.

use std::path::{Path, PathBuf};

use libloading::Library;

use crate::convert::Converter;
use crate::error::{Error, Result};
use crate::plugin::{ABI_VERSION, ConverterRegistry, DECLARATION_SYMBOL, PluginDeclaration};

/// A converter instance together with the library it came from.
///
/// Field order matters: the converter must drop before the library that
/// provides its code is unloaded.
pub struct LoadedConverter {
    name: String,
    converter: Box<dyn Converter>,
    _library: Library,
}

impl LoadedConverter {
    /// The qualified name the converter was resolved under.
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Run the loaded converter.
    pub fn convert(&self, input: &Path, output: &Path) -> Result<()> {
        self.converter.convert(input, output)
    }
}

/// Load a converter by qualified name from a plugin location.
///
/// The location is either a single shared library or a directory scanned for
/// shared libraries (sorted by file name for deterministic resolution).
pub fn load_converter(location: &Path, name: &str) -> Result<LoadedConverter> {
    let candidates = candidate_libraries(location)?;

    // Remember the first contract failure; it is only reported when no
    // candidate loads cleanly, otherwise an unresolved name wins.
    let mut contract_err: Option<Error> = None;
    let mut searched_any = false;

    for path in &candidates {
        // Loading foreign code is inherently unsafe; the ABI check below is
        // the structural validation the contract requires.
        let library = match unsafe { Library::new(path) } {
            Ok(library) => library,
            Err(e) => {
                contract_err.get_or_insert(Error::Library(e));
                continue;
            }
        };

        let declaration = match unsafe { library.get::<*mut PluginDeclaration>(DECLARATION_SYMBOL) }
        {
            Ok(symbol) => unsafe { symbol.read() },
            Err(_) => {
                contract_err.get_or_insert(Error::Contract(format!(
                    "{}: no converter plugin declaration",
                    path.display()
                )));
                continue;
            }
        };

        if declaration.abi_version != ABI_VERSION {
            contract_err.get_or_insert(Error::Contract(format!(
                "{}: ABI version {} (host expects {})",
                path.display(),
                declaration.abi_version,
                ABI_VERSION
            )));
            continue;
        }

        let mut registry = ConverterRegistry::default();
        unsafe { (declaration.register)(&mut registry) };
        searched_any = true;

        if registry.contains(name) {
            let converter = registry.instantiate(name)?;
            return Ok(LoadedConverter {
                name: name.to_string(),
                converter,
                _library: library,
            });
        }
    }

    match contract_err {
        Some(e) if !searched_any => Err(e),
        _ => Err(Error::NotFound(name.to_string())),
    }
}

/// Candidate shared libraries for a plugin location.
fn candidate_libraries(location: &Path) -> Result<Vec<PathBuf>> {
    if !location.exists() {
        return Err(Error::PluginPathMissing(location.to_path_buf()));
    }

    if location.is_dir() {
        let mut libraries: Vec<PathBuf> = std::fs::read_dir(location)?
            .flatten()
            .map(|entry| entry.path())
            .filter(|path| {
                path.is_file()
                    && path
                        .extension()
                        .is_some_and(|ext| ext == std::env::consts::DLL_EXTENSION)
            })
            .collect();
        libraries.sort();
        Ok(libraries)
    } else {
        Ok(vec![location.to_path_buf()])
    }
}
