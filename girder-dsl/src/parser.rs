//! Project declaration parser
//!
//! Evaluates a configuration script in the restricted sandbox and extracts
//! the declared project: parameters, feature integrations, and build types.
//! The script must return exactly one top-level project table.
//!
//! Parsing stops at structure; validation (duplicate build type ids, the
//! emptiness constraint on required parameters) happens when the parsed
//! project is turned into a registry via [`load_registry`].

use anyhow::{Context, Result};
use mlua::{Table, Value};

use girder_core::{
    BuildType, IssueTracker, Parameter, ParameterDisplay, Project, ProjectRegistry, TemplateRef,
};

use crate::sandbox::create_sandbox;

/// Parse a project declaration from Lua source code
///
/// This function evaluates the declaration in the restricted sandbox and
/// extracts the declared structure without validating it.
///
/// # Arguments
/// * `source` - The Lua source code declaring the project
///
/// # Returns
/// The declared project
///
/// # Errors
/// Returns an error if:
/// - The Lua source is invalid or does not return a table
/// - Required fields are missing (a parameter without a name, a build type
///   without an id)
/// - Field types are incorrect
///
/// # Example
/// ```no_run
/// use girder_dsl::parser::parse_project;
///
/// let source = r#"
///     return project.define {
///         id = "ForgeGradle",
///         params = {
///             project.param {
///                 name = "git_main_branch",
///                 value = "FG_6.0",
///                 display = "hidden",
///                 allow_empty = false,
///             },
///         },
///         build_types = {
///             project.build_type {
///                 id = "ForgeGradle__Build",
///                 name = "Build",
///                 templates = { "MinecraftForge_BuildUsingGradle" },
///             },
///         },
///     }
/// "#;
///
/// let project = parse_project(source)?;
/// assert_eq!(project.id.as_deref(), Some("ForgeGradle"));
/// assert_eq!(project.build_types.len(), 1);
/// # Ok::<(), anyhow::Error>(())
/// ```
pub fn parse_project(source: &str) -> Result<Project> {
    let lua = create_sandbox().context("Failed to create configuration sandbox")?;

    // Evaluate the declaration
    let declaration: Table = lua
        .load(source)
        .eval()
        .context("Failed to evaluate project declaration")?;

    let id: Option<String> = declaration.get("id").ok();
    let name: Option<String> = declaration.get("name").ok();
    let description: Option<String> = declaration.get("description").ok();
    let version: Option<String> = declaration.get("version").ok();

    let params = parse_params(&declaration).context("Failed to parse project parameters")?;
    let trackers = parse_features(&declaration)?;
    let build_types = parse_build_types(&declaration)?;

    tracing::debug!(
        params = params.len(),
        trackers = trackers.len(),
        build_types = build_types.len(),
        "parsed project declaration"
    );

    Ok(Project {
        id,
        name,
        description,
        version,
        params,
        trackers,
        build_types,
    })
}

/// Parse and validate a project declaration into a registry
///
/// Runs [`parse_project`] and then builds the validated
/// [`ProjectRegistry`], surfacing duplicate build type ids and unsatisfied
/// required parameters as errors.
pub fn load_registry(source: &str) -> Result<ProjectRegistry> {
    let project = parse_project(source)?;
    ProjectRegistry::new(project).context("Project declaration failed validation")
}

/// Parse the 'params' field from a project or build type table
fn parse_params(scope: &Table) -> Result<Vec<Parameter>> {
    let params_value: Value = scope.get("params").unwrap_or(Value::Nil);

    match params_value {
        Value::Nil => Ok(Vec::new()),
        Value::Table(table) => {
            let mut params = Vec::new();
            for pair in table.sequence_values::<Table>() {
                let param_table = pair.context("Failed to read parameter entry")?;
                params.push(parse_param(&param_table)?);
            }
            Ok(params)
        }
        _ => Err(anyhow::anyhow!(
            "Field 'params' must be an array of parameter tables"
        )),
    }
}

/// Parse a single parameter table
fn parse_param(param_table: &Table) -> Result<Parameter> {
    let name: String = param_table
        .get("name")
        .context("Parameter must have a 'name' field")?;

    // A missing value is an empty default; whether that is acceptable
    // depends on allow_empty and is decided at validation time.
    let value: String = param_table.get("value").unwrap_or_default();

    let label: Option<String> = param_table.get("label").ok();
    let description: Option<String> = param_table.get("description").ok();

    let display = match param_table.get::<Option<String>>("display") {
        Ok(Some(raw)) => raw
            .parse::<ParameterDisplay>()
            .map_err(|e| anyhow::anyhow!("Parameter '{}': {}", name, e))?,
        _ => ParameterDisplay::default(),
    };

    let allow_empty: bool = param_table.get("allow_empty").unwrap_or(true);

    Ok(Parameter {
        name,
        value,
        label,
        description,
        display,
        allow_empty,
    })
}

/// Parse the 'features' field from the project table
///
/// Every feature table carries a 'feature' kind set by its constructor in
/// the sandbox (e.g. `project.github_issues`). Only issue tracker features
/// exist today; an unknown kind is an error rather than silently dropped.
fn parse_features(declaration: &Table) -> Result<Vec<IssueTracker>> {
    let features_value: Value = declaration.get("features").unwrap_or(Value::Nil);

    match features_value {
        Value::Nil => Ok(Vec::new()),
        Value::Table(table) => {
            let mut trackers = Vec::new();
            for pair in table.sequence_values::<Table>() {
                let feature_table = pair.context("Failed to read feature entry")?;

                let kind: String = feature_table
                    .get("feature")
                    .context("Project feature must have a 'feature' kind")?;

                match kind.as_str() {
                    "github_issues" => trackers.push(parse_issue_tracker(&feature_table)?),
                    other => {
                        return Err(anyhow::anyhow!("Unsupported project feature '{}'", other));
                    }
                }
            }
            Ok(trackers)
        }
        _ => Err(anyhow::anyhow!(
            "Field 'features' must be an array of feature tables"
        )),
    }
}

/// Parse a github_issues feature table into an issue tracker link
fn parse_issue_tracker(feature_table: &Table) -> Result<IssueTracker> {
    let id: String = feature_table
        .get("id")
        .context("Issue tracker must have an 'id' field")?;

    let display_name: String = feature_table
        .get("display_name")
        .with_context(|| format!("Issue tracker '{}' must have a 'display_name' field", id))?;

    let repository_url: String = feature_table
        .get("repository_url")
        .with_context(|| format!("Issue tracker '{}' must have a 'repository_url' field", id))?;

    Ok(IssueTracker {
        id,
        display_name,
        repository_url,
    })
}

/// Parse the 'build_types' field from the project table
fn parse_build_types(declaration: &Table) -> Result<Vec<BuildType>> {
    let build_types_value: Value = declaration.get("build_types").unwrap_or(Value::Nil);

    match build_types_value {
        Value::Nil => Ok(Vec::new()),
        Value::Table(table) => {
            let mut build_types = Vec::new();
            for pair in table.sequence_values::<Table>() {
                let build_type_table = pair.context("Failed to read build type entry")?;
                build_types.push(parse_build_type(&build_type_table)?);
            }
            Ok(build_types)
        }
        _ => Err(anyhow::anyhow!(
            "Field 'build_types' must be an array of build type tables"
        )),
    }
}

/// Parse a single build type table
fn parse_build_type(build_type_table: &Table) -> Result<BuildType> {
    let id: String = build_type_table
        .get("id")
        .context("Build type must have an 'id' field")?;

    let name: String = build_type_table
        .get("name")
        .with_context(|| format!("Build type '{}' must have a 'name' field", id))?;

    let description: Option<String> = build_type_table.get("description").ok();

    let templates = parse_templates(build_type_table, &id)?;

    let params = parse_params(build_type_table)
        .with_context(|| format!("Failed to parse parameters of build type '{}'", id))?;

    Ok(BuildType {
        id,
        name,
        description,
        templates,
        params,
    })
}

/// Parse the ordered template reference list of a build type
fn parse_templates(build_type_table: &Table, build_type_id: &str) -> Result<Vec<TemplateRef>> {
    let templates_value: Value = build_type_table.get("templates").unwrap_or(Value::Nil);

    match templates_value {
        Value::Nil => Ok(Vec::new()),
        Value::Table(table) => {
            let mut templates = Vec::new();
            for pair in table.sequence_values::<String>() {
                let template_id = pair.with_context(|| {
                    format!(
                        "Template reference in build type '{}' must be a string",
                        build_type_id
                    )
                })?;
                templates.push(TemplateRef::new(template_id));
            }
            Ok(templates)
        }
        _ => Err(anyhow::anyhow!(
            "Field 'templates' of build type '{}' must be an array of template ids",
            build_type_id
        )),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use girder_core::ConfigError;

    /// ForgeGradle's project declaration, the reference configuration
    /// exercised end to end by these tests.
    const FORGEGRADLE: &str = r#"
        return project.define {
            id = "ForgeGradle",
            version = "2021.2",
            params = {
                project.param {
                    name = "git_main_branch",
                    value = "FG_6.0",
                    label = "Git Main Branch",
                    description = "The git main or default branch to use in VCS operations.",
                    display = "hidden",
                    allow_empty = false,
                },
                project.param {
                    name = "github_repository_name",
                    value = "ForgeGradle",
                    label = "The github repository name. Used to connect to it in VCS Roots.",
                    description = "This is the repository slug on github. So for example `ForgeGradle` or `MinecraftForge`. It is interpolated into the global VCS Roots.",
                    display = "hidden",
                    allow_empty = false,
                },
                project.param {
                    name = "env.PUBLISHED_JAVA_ARTIFACT_ID",
                    value = "ForgeGradle",
                    label = "Published artifact id",
                    description = "The maven coordinate artifact id that has been published by this build. Can not be empty.",
                    allow_empty = false,
                },
                project.param {
                    name = "env.PUBLISHED_JAVA_GROUP",
                    value = "net.minecraftforge.gradle",
                    label = "Published group",
                    description = "The maven coordinate group that has been published by this build. Can not be empty.",
                    allow_empty = false,
                },
                project.param {
                    name = "git_branch_spec",
                    value = "+:refs/heads/(FG_*)",
                    label = "The branch specification of the repository",
                    description = "By default all main branches are build by the configuration. Modify this value to adapt the branches build.",
                    display = "hidden",
                    allow_empty = true,
                },
                project.param {
                    name = "docker_jdk_version",
                    value = "11",
                    label = "JDK version",
                    description = "The version of the JDK to use during execution of tasks in a JDK.",
                    display = "hidden",
                    allow_empty = false,
                },
                project.param {
                    name = "docker_gradle_version",
                    value = "8.4",
                    label = "Gradle version",
                    description = "The version of Gradle to use during execution of Gradle tasks.",
                    display = "hidden",
                    allow_empty = false,
                },
            },
            features = {
                project.github_issues {
                    id = "ForgeGradle__IssueTracker",
                    display_name = "MinecraftForge/ForgeGradle",
                    repository_url = "https://github.com/MinecraftForge/ForgeGradle",
                },
            },
            build_types = {
                project.build_type {
                    id = "ForgeGradle__Build",
                    name = "Build",
                    description = "Builds and Publishes the main branches of the project.",
                    templates = {
                        "MinecraftForge_SetupGradleUtilsCiEnvironmen",
                        "MinecraftForge_BuildWithDiscordNotifications",
                        "MinecraftForge_BuildMainBranches",
                        "MinecraftForge_BuildUsingGradle",
                        "MinecraftForge_PublishProjectUsingGradle",
                        "MinecraftForge_TriggersStaticFilesWebpageGenerator",
                    },
                },
                project.build_type {
                    id = "ForgeGradle__PullRequests__Java11",
                    name = "Pull Requests (Java 11)",
                    description = "Builds pull requests for the project using Java 11",
                    templates = {
                        "MinecraftForge_BuildPullRequests",
                        "MinecraftForge_SetupGradleUtilsCiEnvironmen",
                        "MinecraftForge_BuildWithDiscordNotifications",
                        "MinecraftForge_BuildUsingGradle",
                    },
                    params = {
                        project.param {
                            name = "docker_jdk_version",
                            value = "11",
                            label = "JDK version",
                            description = "The version of the JDK to use during execution of tasks in a JDK.",
                            display = "hidden",
                            allow_empty = false,
                        },
                        project.param {
                            name = "git_branch_spec",
                            value = "",
                            label = "The branch specification of the repository",
                            description = "By default all main branches are build by the configuration. Modify this value to adapt the branches build.",
                            display = "hidden",
                            allow_empty = true,
                        },
                    },
                },
            },
        }
    "#;

    #[test]
    fn test_parse_minimal_project() {
        let source = r#"
            return project.define {
                id = "Empty",
            }
        "#;

        let project = parse_project(source).unwrap();
        assert_eq!(project.id.as_deref(), Some("Empty"));
        assert_eq!(project.params.len(), 0);
        assert_eq!(project.trackers.len(), 0);
        assert_eq!(project.build_types.len(), 0);
    }

    #[test]
    fn test_parse_plain_table_without_helpers() {
        // The helpers are sugar; a plain table declaration parses the same.
        let source = r#"
            return {
                id = "Plain",
                params = {
                    { name = "git_main_branch", value = "main" },
                },
            }
        "#;

        let project = parse_project(source).unwrap();
        assert_eq!(project.id.as_deref(), Some("Plain"));
        assert_eq!(project.params[0].name, "git_main_branch");
        assert_eq!(project.params[0].value, "main");
        assert!(project.params[0].allow_empty);
        assert_eq!(project.params[0].display, ParameterDisplay::Visible);
    }

    #[test]
    fn test_parse_forgegradle_declaration() {
        let project = parse_project(FORGEGRADLE).unwrap();

        assert_eq!(project.id.as_deref(), Some("ForgeGradle"));
        assert_eq!(project.version.as_deref(), Some("2021.2"));
        assert_eq!(project.params.len(), 7);
        assert_eq!(project.trackers.len(), 1);
        assert_eq!(project.build_types.len(), 2);

        let tracker = &project.trackers[0];
        assert_eq!(tracker.id, "ForgeGradle__IssueTracker");
        assert_eq!(tracker.display_name, "MinecraftForge/ForgeGradle");
        assert_eq!(
            tracker.repository_url,
            "https://github.com/MinecraftForge/ForgeGradle"
        );

        let main_branch = project.param("git_main_branch").unwrap();
        assert_eq!(main_branch.value, "FG_6.0");
        assert_eq!(main_branch.display, ParameterDisplay::Hidden);
        assert!(!main_branch.allow_empty);

        let group = project.param("env.PUBLISHED_JAVA_GROUP").unwrap();
        assert_eq!(group.value, "net.minecraftforge.gradle");
        assert_eq!(group.display, ParameterDisplay::Visible);

        let build = project.build_type("ForgeGradle__Build").unwrap();
        assert_eq!(build.name, "Build");
        assert_eq!(build.templates.len(), 6);
        assert_eq!(
            build.templates[0].as_str(),
            "MinecraftForge_SetupGradleUtilsCiEnvironmen"
        );
        assert_eq!(
            build.templates[5].as_str(),
            "MinecraftForge_TriggersStaticFilesWebpageGenerator"
        );
        assert!(build.params.is_empty());

        let prs = project.build_type("ForgeGradle__PullRequests__Java11").unwrap();
        assert_eq!(prs.name, "Pull Requests (Java 11)");
        assert_eq!(prs.templates.len(), 4);
        assert_eq!(prs.params.len(), 2);
    }

    #[test]
    fn test_load_forgegradle_registry_resolves_overrides() {
        let registry = load_registry(FORGEGRADLE).unwrap();

        // The pull request build type shadows git_branch_spec with an empty
        // value and pins the JDK, for that build type only.
        let prs = registry
            .effective_params("ForgeGradle__PullRequests__Java11")
            .unwrap();
        assert_eq!(prs.len(), 7);

        let branch_spec = prs.iter().find(|p| p.name == "git_branch_spec").unwrap();
        assert_eq!(branch_spec.value, "");

        let jdk = prs.iter().find(|p| p.name == "docker_jdk_version").unwrap();
        assert_eq!(jdk.value, "11");

        // The main build type sees the project defaults.
        let main = registry.effective_params("ForgeGradle__Build").unwrap();
        let branch_spec = main.iter().find(|p| p.name == "git_branch_spec").unwrap();
        assert_eq!(branch_spec.value, "+:refs/heads/(FG_*)");
    }

    #[test]
    fn test_load_is_idempotent() {
        let first = load_registry(FORGEGRADLE).unwrap();
        let second = load_registry(FORGEGRADLE).unwrap();
        assert_eq!(first.project(), second.project());
    }

    #[test]
    fn test_parse_parameter_missing_name() {
        let source = r#"
            return {
                params = {
                    { value = "FG_6.0" },
                },
            }
        "#;

        let result = parse_project(source);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("name"));
    }

    #[test]
    fn test_parse_parameter_unknown_display_mode() {
        let source = r#"
            return {
                params = {
                    { name = "git_main_branch", value = "FG_6.0", display = "invisible" },
                },
            }
        "#;

        let result = parse_project(source);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("display mode"));
    }

    #[test]
    fn test_parse_build_type_missing_id() {
        let source = r#"
            return {
                build_types = {
                    { name = "Build" },
                },
            }
        "#;

        let result = parse_project(source);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("id"));
    }

    #[test]
    fn test_parse_build_type_missing_name() {
        let source = r#"
            return {
                build_types = {
                    { id = "ForgeGradle__Build" },
                },
            }
        "#;

        let result = parse_project(source);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("name"));
    }

    #[test]
    fn test_parse_template_refs_must_be_strings() {
        let source = r#"
            return {
                build_types = {
                    { id = "Build", name = "Build", templates = { { id = "nested" } } },
                },
            }
        "#;

        let result = parse_project(source);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Template reference"));
    }

    #[test]
    fn test_parse_feature_without_kind() {
        let source = r#"
            return {
                features = {
                    { id = "Tracker", display_name = "t", repository_url = "u" },
                },
            }
        "#;

        let result = parse_project(source);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("feature"));
    }

    #[test]
    fn test_parse_unsupported_feature_kind() {
        let source = r#"
            return {
                features = {
                    { feature = "jira", id = "Tracker" },
                },
            }
        "#;

        let result = parse_project(source);
        assert!(result.is_err());
        assert!(format!("{:#}", result.unwrap_err()).contains("Unsupported project feature"));
    }

    #[test]
    fn test_parse_invalid_lua() {
        let result = parse_project("this is not valid lua!!!");
        assert!(result.is_err());
    }

    #[test]
    fn test_parse_declaration_not_returning_table() {
        let result = parse_project(r#"return "not a table""#);
        assert!(result.is_err());
    }

    #[test]
    fn test_load_duplicate_build_type_id() {
        let source = r#"
            return {
                build_types = {
                    { id = "ForgeGradle__Build", name = "Build" },
                    { id = "ForgeGradle__Build", name = "Build again" },
                },
            }
        "#;

        let err = load_registry(source).unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(config_err.is_duplicate_id());
    }

    #[test]
    fn test_load_required_parameter_left_empty() {
        let source = r#"
            return {
                params = {
                    { name = "docker_jdk_version", value = "", allow_empty = false },
                },
                build_types = {
                    { id = "Build", name = "Build" },
                },
            }
        "#;

        let err = load_registry(source).unwrap_err();
        let config_err = err.downcast_ref::<ConfigError>().unwrap();
        assert!(matches!(
            config_err,
            ConfigError::MissingRequiredParameter { name, .. } if name == "docker_jdk_version"
        ));
    }

    #[test]
    fn test_load_required_parameter_satisfied_by_override() {
        let source = r#"
            return {
                params = {
                    { name = "docker_jdk_version", value = "", allow_empty = false },
                },
                build_types = {
                    {
                        id = "Build",
                        name = "Build",
                        params = {
                            { name = "docker_jdk_version", value = "17", allow_empty = false },
                        },
                    },
                },
            }
        "#;

        let registry = load_registry(source).unwrap();
        let effective = registry.effective_params("Build").unwrap();
        assert_eq!(effective[0].value, "17");
    }
}
