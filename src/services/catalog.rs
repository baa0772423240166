use crate::cli::ApiVersion;
use crate::domain::models::ListResult;
use crate::library::{DspLibrary, LibraryError};

/// Fetches the block catalog with both name lists sorted.
pub fn sorted_catalog(lib: &dyn DspLibrary, api: ApiVersion) -> Result<ListResult, LibraryError> {
    let mut list = lib.list(api)?;
    list.dsp_block_names.sort();
    list.control_block_names.sort();
    Ok(list)
}

pub fn dsp_blocks(lib: &dyn DspLibrary, api: ApiVersion) -> Result<Vec<String>, LibraryError> {
    Ok(sorted_catalog(lib, api)?.dsp_block_names)
}

pub fn control_blocks(lib: &dyn DspLibrary, api: ApiVersion) -> Result<Vec<String>, LibraryError> {
    Ok(sorted_catalog(lib, api)?.control_block_names)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::library::fake::FakeLibrary;

    fn names(v: &[&str]) -> Vec<String> {
        v.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn block_lists_are_sorted_regardless_of_library_order() {
        let lib = FakeLibrary {
            list: ListResult {
                dsp_block_names: names(&["Mixer", "Delay", "Biquad", "Limiter"]),
                control_block_names: names(&["VolumeRamp", "Ducker", "Mute"]),
            },
            ..FakeLibrary::default()
        };
        assert_eq!(
            dsp_blocks(&lib, ApiVersion::V1alpha1).unwrap(),
            names(&["Biquad", "Delay", "Limiter", "Mixer"])
        );
        assert_eq!(
            control_blocks(&lib, ApiVersion::V1alpha1).unwrap(),
            names(&["Ducker", "Mute", "VolumeRamp"])
        );
    }

    #[test]
    fn empty_catalog_is_not_an_error() {
        let lib = FakeLibrary::default();
        assert!(dsp_blocks(&lib, ApiVersion::V1alpha1).unwrap().is_empty());
        assert_eq!(lib.calls(), vec!["list"]);
    }
}
