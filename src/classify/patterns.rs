use regex::Regex;

type SuggestFn = fn(Option<&str>) -> Vec<String>;

/// One entry of the failure taxonomy.
///
/// Matched against lowercased log text. The first capture group, when the
/// pattern declares one and it participates in the match, is handed to the
/// suggestion generator for interpolation.
pub struct ErrorPattern {
    pub(crate) regex: Regex,
    /// Fine-grained cause, e.g. "missing_dependency"
    pub error_type: &'static str,
    /// Coarse taxonomy bucket, e.g. "dependency"
    pub category: &'static str,
    pub description: &'static str,
    suggest: SuggestFn,
}

impl ErrorPattern {
    fn new(
        pattern: &str,
        error_type: &'static str,
        category: &'static str,
        description: &'static str,
        suggest: SuggestFn,
    ) -> Self {
        Self {
            regex: Regex::new(pattern).expect("invalid taxonomy pattern"),
            error_type,
            category,
            description,
            suggest,
        }
    }

    pub fn suggestions(&self, capture: Option<&str>) -> Vec<String> {
        (self.suggest)(capture)
    }
}

/// Build the ordered failure taxonomy.
///
/// Evaluation order is declaration order and the first matching entry wins,
/// so broader patterns belong after the specific ones they would shadow.
pub fn taxonomy() -> Vec<ErrorPattern> {
    vec![
        // dependency
        ErrorPattern::new(
            r"cannot find module '([^']+)'",
            "missing_dependency",
            "dependency",
            "A required module could not be resolved at runtime",
            missing_module_suggestions,
        ),
        ErrorPattern::new(
            r"could not find a version that satisfies the requirement ([^\s]+)",
            "unresolvable_package",
            "dependency",
            "The package index has no version matching the requested constraint",
            unresolvable_package_suggestions,
        ),
        ErrorPattern::new(
            r"npm err! 404\s+'?([^'\s]+)'? is not in (?:the|this) (?:npm )?registry",
            "package_not_found",
            "dependency",
            "The requested package does not exist in the registry",
            package_not_found_suggestions,
        ),
        // permission
        ErrorPattern::new(
            r"permission denied|\beacces\b",
            "permission_denied",
            "permission",
            "A file or directory was accessed without sufficient permissions",
            permission_suggestions,
        ),
        // authentication
        ErrorPattern::new(
            r"bad credentials|authentication failed|401 unauthorized|invalid credentials",
            "auth_failure",
            "authentication",
            "The remote service rejected the supplied credentials",
            auth_suggestions,
        ),
        ErrorPattern::new(
            r"token (?:is )?expired|expired token",
            "token_expired",
            "authentication",
            "The access token is no longer valid",
            token_expired_suggestions,
        ),
        // file_system
        ErrorPattern::new(
            r"no such file or directory(?:[,:]? (?:open )?'([^']+)')?",
            "file_not_found",
            "file_system",
            "A referenced file or directory does not exist",
            file_not_found_suggestions,
        ),
        // environment
        ErrorPattern::new(
            r"([a-z0-9._+-]+): command not found",
            "command_not_found",
            "environment",
            "A command used by the step is not installed on the runner",
            command_not_found_suggestions,
        ),
        ErrorPattern::new(
            r"environment variable '?([a-z_][a-z0-9_]*)'? (?:is )?not (?:set|defined)",
            "missing_env_var",
            "environment",
            "A required environment variable is missing",
            missing_env_var_suggestions,
        ),
        // testing
        ErrorPattern::new(
            r"\d+ (?:tests? )?failed|tests? failed|assertion failed",
            "test_failure",
            "testing",
            "One or more tests did not pass",
            test_failure_suggestions,
        ),
        // compilation
        ErrorPattern::new(
            r"could not compile `([^`]+)`|compilation (?:error|failed)|syntax error",
            "compile_error",
            "compilation",
            "Source code failed to compile",
            compile_error_suggestions,
        ),
        ErrorPattern::new(
            r"mismatched types|type error",
            "type_error",
            "compilation",
            "A type check failed during compilation",
            type_error_suggestions,
        ),
        // network
        ErrorPattern::new(
            r"connection refused|\beconnrefused\b",
            "connection_refused",
            "network",
            "A remote endpoint actively refused the connection",
            connection_refused_suggestions,
        ),
        ErrorPattern::new(
            r"(?:could not resolve host:? |getaddrinfo enotfound )([a-z0-9.-]+)",
            "dns_resolution",
            "network",
            "A hostname could not be resolved",
            dns_suggestions,
        ),
        ErrorPattern::new(
            r"connection timed out|\betimedout\b|network is unreachable",
            "network_timeout",
            "network",
            "A network operation did not complete in time",
            network_timeout_suggestions,
        ),
        // performance
        ErrorPattern::new(
            r"exceeded the maximum execution time|timed out after|job execution time exceeded",
            "job_timeout",
            "performance",
            "The job ran longer than its allowed execution time",
            job_timeout_suggestions,
        ),
        // resource
        ErrorPattern::new(
            r"out of memory|heap out of memory|cannot allocate memory|oom-kill",
            "out_of_memory",
            "resource",
            "The runner ran out of memory",
            oom_suggestions,
        ),
        ErrorPattern::new(
            r"no space left on device|disk quota exceeded",
            "disk_full",
            "resource",
            "The runner ran out of disk space",
            disk_full_suggestions,
        ),
        // version_control
        ErrorPattern::new(
            r"fatal: repository '([^']+)' not found|merge conflict|failed to push some refs|fatal: couldn't find remote ref",
            "git_failure",
            "version_control",
            "A git operation failed",
            git_failure_suggestions,
        ),
        // container
        ErrorPattern::new(
            r"pull access denied(?: for ([^\s,]+))?|manifest unknown|manifest for .+ not found",
            "image_pull_failure",
            "container",
            "A container image could not be pulled",
            image_pull_suggestions,
        ),
        ErrorPattern::new(
            r"cannot connect to the docker daemon",
            "docker_daemon_unavailable",
            "container",
            "The container runtime is not reachable on the runner",
            docker_daemon_suggestions,
        ),
        // configuration
        ErrorPattern::new(
            r"invalid workflow file|workflow is not valid|mapping values are not allowed|did not find expected key",
            "invalid_configuration",
            "configuration",
            "A workflow or configuration file failed to parse",
            configuration_suggestions,
        ),
        // compatibility
        ErrorPattern::new(
            r"requires (?:node|python|java|ruby|go) (?:version )?([^\s,]+)|unsupported engine|incompatible version",
            "unsupported_version",
            "compatibility",
            "A tool version on the runner does not satisfy a requirement",
            version_mismatch_suggestions,
        ),
    ]
}

fn missing_module_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(module) => vec![
            format!("Add '{module}' to the dependency manifest"),
            format!("Verify '{module}' is spelled correctly and actually published"),
            "Make sure the install step runs before the failing step".to_string(),
            "Clear the dependency cache and reinstall".to_string(),
        ],
        None => vec![
            "Add the missing module to the dependency manifest".to_string(),
            "Make sure the install step runs before the failing step".to_string(),
            "Clear the dependency cache and reinstall".to_string(),
        ],
    }
}

fn unresolvable_package_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(req) => vec![
            format!("Relax the version constraint on '{req}'"),
            format!("Check that '{req}' supports the interpreter version used in CI"),
            "Verify the package index URL is reachable from the runner".to_string(),
        ],
        None => vec![
            "Relax the failing version constraint".to_string(),
            "Check that the package supports the interpreter version used in CI".to_string(),
            "Verify the package index URL is reachable from the runner".to_string(),
        ],
    }
}

fn package_not_found_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(name) => vec![
            format!("Check the spelling of '{name}' in the manifest"),
            format!("If '{name}' is private, configure registry authentication"),
            "Confirm the configured registry hosts the package".to_string(),
        ],
        None => vec![
            "Check the package name spelling in the manifest".to_string(),
            "If the package is private, configure registry authentication".to_string(),
            "Confirm the configured registry hosts the package".to_string(),
        ],
    }
}

fn permission_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Check file permissions on the paths the step touches".to_string(),
        "Mark scripts executable (chmod +x) before invoking them".to_string(),
        "Avoid writing outside the workspace directory on hosted runners".to_string(),
    ]
}

fn auth_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Verify the credentials secret is set for this repository".to_string(),
        "Check that the token has the scopes the step requires".to_string(),
        "Confirm the secret name in the workflow matches the configured secret".to_string(),
        "Regenerate the token if it may have been revoked".to_string(),
    ]
}

fn token_expired_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Rotate the expired token and update the repository secret".to_string(),
        "Prefer short-lived tokens minted per run where supported".to_string(),
        "Check for a configured expiry policy on the credential".to_string(),
    ]
}

fn file_not_found_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(path) => vec![
            format!("Check that '{path}' exists at the expected location"),
            format!("Verify the working directory when '{path}' is resolved relatively"),
            "Make sure an earlier step actually produced the file".to_string(),
        ],
        None => vec![
            "Check the referenced path exists at the expected location".to_string(),
            "Verify the step's working directory for relative paths".to_string(),
            "Make sure an earlier step actually produced the file".to_string(),
        ],
    }
}

fn command_not_found_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(command) => vec![
            format!("Install '{command}' in a setup step before it is used"),
            format!("Check whether '{command}' needs a setup action or container image"),
            "Verify PATH includes the tool's install location".to_string(),
        ],
        None => vec![
            "Install the missing command in a setup step before it is used".to_string(),
            "Verify PATH includes the tool's install location".to_string(),
        ],
    }
}

fn missing_env_var_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(var) => vec![
            format!("Define '{}' in the workflow env or repository secrets", var.to_uppercase()),
            "Check the variable is exported at the job level, not only in one step".to_string(),
            "Secrets are unavailable to workflows triggered from forks".to_string(),
        ],
        None => vec![
            "Define the missing variable in the workflow env or repository secrets".to_string(),
            "Check the variable is exported at the job level, not only in one step".to_string(),
        ],
    }
}

fn test_failure_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Run the failing tests locally with the same toolchain version".to_string(),
        "Check for environment-dependent assertions (timezones, locales, paths)".to_string(),
        "Re-run the job once to rule out flakiness before changing code".to_string(),
    ]
}

fn compile_error_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(krate) => vec![
            format!("Build '{krate}' locally with the CI toolchain version"),
            "Check the full compiler output above the failure line".to_string(),
            "Verify the toolchain version pinned in CI matches local".to_string(),
        ],
        None => vec![
            "Reproduce the build locally with the CI toolchain version".to_string(),
            "Check the full compiler output above the failure line".to_string(),
            "Verify the toolchain version pinned in CI matches local".to_string(),
        ],
    }
}

fn type_error_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Run the type checker locally before pushing".to_string(),
        "Check for dependency upgrades that changed public types".to_string(),
        "Verify generated code is regenerated after schema changes".to_string(),
    ]
}

fn connection_refused_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Check the target service is up and listening on the expected port".to_string(),
        "If the service is a test container, wait for its readiness probe".to_string(),
        "Verify the host and port configuration for the CI environment".to_string(),
    ]
}

fn dns_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(host) => vec![
            format!("Check the hostname '{host}' for typos"),
            format!("Verify '{host}' is reachable from the runner network"),
            "Internal hostnames need a self-hosted runner inside the network".to_string(),
        ],
        None => vec![
            "Check the hostname for typos".to_string(),
            "Verify the host is reachable from the runner network".to_string(),
        ],
    }
}

fn network_timeout_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Retry the job; transient network failures are common on hosted runners".to_string(),
        "Add retries with backoff around external network calls".to_string(),
        "Check the remote service's status page for an ongoing incident".to_string(),
    ]
}

fn job_timeout_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Raise the job's timeout-minutes if the workload legitimately grew".to_string(),
        "Cache dependencies to cut setup time".to_string(),
        "Split long jobs into parallel shards".to_string(),
        "Profile the slowest steps to find regressions".to_string(),
    ]
}

fn oom_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Use a larger runner or reduce build parallelism".to_string(),
        "Cap the memory of memory-hungry tools (e.g. JVM/node heap flags)".to_string(),
        "Check for tests that accumulate state across cases".to_string(),
    ]
}

fn disk_full_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Prune caches and temporary artifacts between steps".to_string(),
        "Remove unused preinstalled toolchains at job start to free space".to_string(),
        "Store large artifacts externally instead of on the runner disk".to_string(),
    ]
}

fn git_failure_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(repo) => vec![
            format!("Check that '{repo}' exists and the token can read it"),
            "Verify the checkout ref exists on the remote".to_string(),
            "Rebase onto the target branch to resolve conflicts".to_string(),
        ],
        None => vec![
            "Verify the checkout ref exists on the remote".to_string(),
            "Check the token has access to the repository".to_string(),
            "Rebase onto the target branch to resolve conflicts".to_string(),
        ],
    }
}

fn image_pull_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(image) => vec![
            format!("Check the image reference '{image}' (registry, name, tag)"),
            format!("If '{image}' is private, log in to its registry first"),
            "Confirm the tag still exists; it may have been deleted".to_string(),
        ],
        None => vec![
            "Check the image reference (registry, name, tag)".to_string(),
            "If the image is private, log in to its registry first".to_string(),
            "Confirm the tag still exists; it may have been deleted".to_string(),
        ],
    }
}

fn docker_daemon_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Use a runner image with a container runtime available".to_string(),
        "Start the docker service before container steps".to_string(),
        "Check the DOCKER_HOST value if a remote daemon is intended".to_string(),
    ]
}

fn configuration_suggestions(_capture: Option<&str>) -> Vec<String> {
    vec![
        "Validate the workflow file with a YAML linter".to_string(),
        "Check indentation around the reported line".to_string(),
        "Quote values containing ':' or '#' characters".to_string(),
    ]
}

fn version_mismatch_suggestions(capture: Option<&str>) -> Vec<String> {
    match capture {
        Some(version) => vec![
            format!("Pin the CI toolchain to version {version}"),
            "Align the version in CI with the one declared by the project".to_string(),
            "Check the setup step installs the expected major version".to_string(),
        ],
        None => vec![
            "Align the tool version in CI with the one declared by the project".to_string(),
            "Check the setup step installs the expected major version".to_string(),
        ],
    }
}
