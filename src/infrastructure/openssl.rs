//! openssl certificate toolkit

use std::path::Path;

use crate::domain::ports::{CertEncoding, CertToolkit, CommandRunner};
use crate::domain::value_objects::CommandResult;
use crate::error::{DeployResult, DeployStep};
use crate::infrastructure::process::{locate_program, process_error};

pub struct OpenSslToolkit<R: CommandRunner> {
    runner: R,
    program: String,
}

impl<R: CommandRunner> OpenSslToolkit<R> {
    pub fn new(runner: R, program: impl Into<String>) -> Self {
        Self {
            runner,
            program: program.into(),
        }
    }

    pub fn locate(runner: R, program: &str) -> DeployResult<Self> {
        let path = locate_program(program)?;
        Ok(Self::new(runner, path.to_string_lossy()))
    }

    pub fn runner(&self) -> &R {
        &self.runner
    }

    fn x509(&self, args: Vec<String>) -> DeployResult<CommandResult> {
        let mut full = vec!["x509".to_string()];
        full.extend(args);
        self.runner
            .run(&self.program, &full)
            .map_err(|e| process_error(&self.program, e, DeployStep::Certificate))
    }
}

impl<R: CommandRunner> CertToolkit for OpenSslToolkit<R> {
    fn to_pem(&self, input: &Path, output: &Path, encoding: CertEncoding) -> DeployResult<CommandResult> {
        self.x509(vec![
            "-inform".to_string(),
            encoding.as_str().to_string(),
            "-in".to_string(),
            input.to_string_lossy().into_owned(),
            "-out".to_string(),
            output.to_string_lossy().into_owned(),
        ])
    }

    fn subject_hash_old(&self, pem: &Path) -> DeployResult<CommandResult> {
        self.x509(vec![
            "-inform".to_string(),
            "PEM".to_string(),
            "-subject_hash_old".to_string(),
            "-noout".to_string(),
            "-in".to_string(),
            pem.to_string_lossy().into_owned(),
        ])
    }
}
