//! Loading a directory of sources into a host.

use std::fs;

use luna::hir::CompilationConfig;
use luna::ide::AnalysisHost;
use luna::project::WorkspaceLoader;
use tempfile::TempDir;

use crate::helpers::analysis_helpers::position_of;
use crate::helpers::source_fixtures::*;

fn workspace() -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir_all(dir.path().join("lib")).unwrap();
    fs::write(dir.path().join("lib/util.lua"), MODULE_UTIL).unwrap();
    fs::write(dir.path().join("main.lua"), MODULE_USER).unwrap();
    fs::write(dir.path().join("readme.txt"), "not lua").unwrap();
    dir
}

#[test]
fn test_load_directory_indexes_lua_files() {
    let dir = workspace();
    let host = AnalysisHost::new(CompilationConfig::with_root(dir.path()));

    let loaded = WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &host)
        .unwrap();
    assert_eq!(loaded, 2);

    let analysis = host.analysis();
    assert_eq!(analysis.compilation().len(), 2);
    let util = analysis.document_id(dir.path().join("lib/util.lua")).unwrap();
    assert_eq!(analysis.module_name(util).as_deref(), Some("lib.util"));
}

#[test]
fn test_loaded_modules_resolve_require() {
    let dir = workspace();
    let host = AnalysisHost::new(CompilationConfig::with_root(dir.path()));
    WorkspaceLoader::new()
        .load_directory_into_host(dir.path(), &host)
        .unwrap();

    let analysis = host.analysis();
    let main = analysis.document_id(dir.path().join("main.lua")).unwrap();
    let (line, col) = position_of(MODULE_USER, "out)", 0);
    let info = analysis.type_info(main, line, col).unwrap();
    assert_eq!(info.rendered(), "string");
}

#[test]
fn test_custom_extensions() {
    let dir = workspace();
    fs::write(dir.path().join("types.luau"), "local x = 1").unwrap();
    let loader = WorkspaceLoader::with_extensions(["luau"]);
    let paths = loader.collect_file_paths(dir.path()).unwrap();
    assert_eq!(paths, vec![dir.path().join("types.luau")]);
}

#[test]
fn test_reloading_a_file_keeps_its_id() {
    let dir = workspace();
    let host = AnalysisHost::new(CompilationConfig::with_root(dir.path()));
    let loader = WorkspaceLoader::new();
    loader.load_directory_into_host(dir.path(), &host).unwrap();
    let main_path = dir.path().join("main.lua");
    let before = host.analysis().document_id(&main_path).unwrap();

    fs::write(&main_path, "print('changed')").unwrap();
    loader.load_file_into_host(&main_path, &host).unwrap();

    let analysis = host.analysis();
    assert_eq!(analysis.document_id(&main_path), Some(before));
    assert_eq!(analysis.compilation().document(before).unwrap().text(), "print('changed')");
}
