mod tests_goto;
mod tests_references;
mod tests_symbols;
mod tests_workspace_loader;
