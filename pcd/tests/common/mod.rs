#![allow(dead_code)]

use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

/// Helper to create a temporary project directory
pub struct TempProject {
    pub dir: TempDir,
}

impl TempProject {
    /// Create a new temporary project
    pub fn new() -> Self {
        let dir = TempDir::new().expect("Failed to create temp directory");
        Self { dir }
    }

    /// Get the path to the project directory
    pub fn path(&self) -> &Path {
        self.dir.path()
    }

    /// Create a file in the project with the given content
    pub fn create_file(&self, relative_path: &str, content: &str) -> &Self {
        let file_path = self.dir.path().join(relative_path);

        if let Some(parent) = file_path.parent() {
            fs::create_dir_all(parent).expect("Failed to create parent directories");
        }

        fs::write(&file_path, content).expect("Failed to write file");
        self
    }

    /// Get the absolute path to a file in the project
    pub fn file_path(&self, relative_path: &str) -> PathBuf {
        self.dir.path().join(relative_path)
    }
}

impl Default for TempProject {
    fn default() -> Self {
        Self::new()
    }
}

/// requirements.txt with comments, directives and markers
pub fn sample_requirements_txt() -> &'static str {
    r#"# Sample requirements.txt
-r requirements-base.txt
--index-url https://pypi.org/simple
requests>=2.28.0,<3.0.0
numpy==1.24.0  # pinned
Click[colors]>=8.0 ; python_version >= "3.8"
"#
}

/// setup.py with literal arguments
pub fn sample_setup_py() -> &'static str {
    r#"from setuptools import setup, find_packages

setup(
    name="sample",
    version="0.1.0",
    packages=find_packages(),
    install_requires=["requests", "numpy>=1.24"],
    extras_require={
        "cli": ["click>=8"],
    },
)
"#
}

/// setup.cfg declaring the same packages as the other samples
pub fn sample_setup_cfg() -> &'static str {
    r#"[metadata]
name = sample

[options]
install_requires =
    requests
    numpy

[options.extras_require]
cli = click>=8
"#
}

/// pyproject.toml with PEP 621 dependencies
pub fn sample_pyproject_pep621() -> &'static str {
    r#"[project]
name = "sample"
version = "0.1.0"
dependencies = [
    "requests>=2.28.0,<3.0.0",
    "numpy==1.24.0",
]

[project.optional-dependencies]
cli = ["click>=8"]

[build-system]
requires = ["setuptools>=61.0"]
build-backend = "setuptools.build_meta"
"#
}

/// pyproject.toml with Poetry dependencies
pub fn sample_pyproject_poetry() -> &'static str {
    r#"[tool.poetry]
name = "sample"
version = "0.1.0"

[tool.poetry.dependencies]
python = "^3.9"
requests = "^2.28.0"
numpy = "1.24.0"

[tool.poetry.group.cli.dependencies]
click = "^8.0"
"#
}

/// Code importing everything the samples declare
pub fn sample_code() -> &'static str {
    r#"import os
import sys

import click
import numpy as np
from requests import Session

from .utils import helper
"#
}

/// Project with matching code and requirements.txt
pub fn create_clean_project() -> TempProject {
    let project = TempProject::new();
    project.create_file("requirements.txt", sample_requirements_txt());
    project.create_file("src/app.py", sample_code());
    project
}
