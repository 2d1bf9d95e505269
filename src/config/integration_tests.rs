#[cfg(test)]
mod integration_tests {
    use crate::config::{load_and_validate_config, RuntimeBuilder};
    use std::path::PathBuf;
    use std::time::Duration;

    /// The shipped Swift configuration matches the built-in defaults
    #[test]
    fn test_playground_yaml_loading() {
        let config = load_and_validate_config("configs/playground.yaml").unwrap();

        assert_eq!(config.storage_root(), PathBuf::from("/tmp"));
        assert_eq!(config.annotations.truncation_length, 60);
        assert_eq!(config.workspace.main_file, "main.swift");
        assert_eq!(config.toolchain.manifest.program, "swift");
        assert_eq!(config.toolchain.manifest.args, vec!["package", "dump-package"]);
        assert!(config.toolchain.build.args.contains(&"-debugger-support".to_string()));
        assert!(config.toolchain.execute.is_none());
        assert_eq!(config.executor_options.timeout(), Some(Duration::from_secs(300)));
    }

    #[test]
    fn test_shell_toolchain_yaml_loading() {
        let config = load_and_validate_config("configs/shell-toolchain.yaml").unwrap();

        assert_eq!(config.annotations.truncation_length, 24);
        assert_eq!(config.annotations.ellipsis, " ...");
        assert_eq!(config.toolchain.build.program, "sh");
        let execute = config.toolchain.execute.as_ref().unwrap();
        assert!(execute.args[1].ends_with(">&3"));
    }

    /// Building a runtime resolves the bundle and keys its workspace under the storage root
    #[test]
    fn test_build_runtime_from_yaml() {
        let config = load_and_validate_config("configs/playground.yaml").unwrap();
        let playground =
            RuntimeBuilder::from_config(&config, "/work/Demo.playground/Pages/Contents.swift");

        assert_eq!(
            playground.bundle().root(),
            PathBuf::from("/work/Demo.playground").as_path()
        );
        assert_eq!(playground.template(), PathBuf::from("build/template.playground").as_path());
        let workspace = playground.workspace_path();
        assert!(workspace.starts_with("/tmp"));
        assert!(workspace
            .file_name()
            .unwrap()
            .to_string_lossy()
            .starts_with("swift-playground-"));
    }
}
