//! Lua sandbox creation
//!
//! Configuration scripts are pure declarations, so the sandbox they run in
//! excludes everything beyond basic Lua: no filesystem access, no process
//! execution, no loading of external code.
//!
//! The `project` helper module is always injected; it is the only global the
//! DSL adds on top of the restricted standard library.

use mlua::{Lua, LuaOptions, Result as LuaResult, StdLib, Table};

/// Create a restricted Lua sandbox for evaluating project declarations
///
/// The sandbox includes only basic Lua functionality (tables, strings, math,
/// coroutines) and does NOT include any I/O capabilities or the ability to
/// load external code.
///
/// # Security
/// This sandbox prevents:
/// - Network access
/// - File system access
/// - Process execution
/// - Loading external modules via require()
///
/// # Example
/// ```no_run
/// use girder_dsl::sandbox::create_sandbox;
///
/// let lua = create_sandbox()?;
///
/// let source = r#"
///     return project.define {
///         id = "ForgeGradle",
///         params = {
///             project.param { name = "git_main_branch", value = "FG_6.0" },
///         },
///     }
/// "#;
/// let declaration: mlua::Table = lua.load(source).eval()?;
/// let id: String = declaration.get("id")?;
/// # Ok::<(), mlua::Error>(())
/// ```
pub fn create_sandbox() -> LuaResult<Lua> {
    // Restricted standard libraries only.
    // Allow: TABLE, STRING, MATH, COROUTINE
    // Exclude: IO, OS, PACKAGE, DEBUG
    let lua = Lua::new_with(
        StdLib::TABLE | StdLib::STRING | StdLib::MATH | StdLib::COROUTINE,
        LuaOptions::default(),
    )?;

    // Remove dangerous globals
    lua.globals().set("require", mlua::Nil)?;
    lua.globals().set("dofile", mlua::Nil)?;
    lua.globals().set("loadfile", mlua::Nil)?;

    register_project_module(&lua)?;

    Ok(lua)
}

/// Register the project module
///
/// Helper functions for declaring projects. Most are passthroughs that
/// return their argument table; they exist to make declarations read like
/// the configuration they produce, and to give feature constructors a place
/// to tag their tables with a kind.
fn register_project_module(lua: &Lua) -> LuaResult<()> {
    let project = lua.create_table()?;

    // project.define(declaration) - returns the declaration table as-is
    let define_fn = lua.create_function(|_, declaration: Table| Ok(declaration))?;
    project.set("define", define_fn)?;

    // project.param(config) - returns the config table as-is
    let param_fn = lua.create_function(|_, config: Table| Ok(config))?;
    project.set("param", param_fn)?;

    // project.build_type(config) - returns the config table as-is
    let build_type_fn = lua.create_function(|_, config: Table| Ok(config))?;
    project.set("build_type", build_type_fn)?;

    // project.template(id) - returns the template id as-is
    let template_fn = lua.create_function(|_, id: String| Ok(id))?;
    project.set("template", template_fn)?;

    // project.github_issues(config) - tags the config as a github_issues feature
    let github_issues_fn = lua.create_function(|_, config: Table| {
        config.set("feature", "github_issues")?;
        Ok(config)
    })?;
    project.set("github_issues", github_issues_fn)?;

    lua.globals().set("project", project)?;

    Ok(())
}
