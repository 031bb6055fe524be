//! A demo driver for `cmsl::execute`, in the spirit of `ouros-repl`: not
//! part of the specified surface, just enough to run a script end-to-end
//! during development. Reads a whole source file (or stdin) and prints
//! the diagnostics and the `main` return value.

use std::{
    cell::{Cell, RefCell},
    io::Read,
    process::ExitCode,
};

use cmsl::facade::{CmakeFacade, CxxCompilerInfo, Visibility};

fn main() -> ExitCode {
    let args: Vec<String> = std::env::args().collect();

    let source = if let Some(path) = args.get(1) {
        match std::fs::read_to_string(path) {
            Ok(s) => s,
            Err(err) => {
                eprintln!("error reading {path}: {err}");
                return ExitCode::FAILURE;
            }
        }
    } else {
        let mut buf = String::new();
        if let Err(err) = std::io::stdin().read_to_string(&mut buf) {
            eprintln!("error reading stdin: {err}");
            return ExitCode::FAILURE;
        }
        buf
    };

    let facade = PrintingFacade::new();
    let (result, diagnostics) = cmsl::execute(&source, &facade);

    for diagnostic in &diagnostics {
        eprintln!("{}:{} {}", diagnostic.phase, diagnostic.severity, diagnostic.message);
    }

    println!("exit: {result}");

    if result == cmsl::eval::FATAL_SENTINEL {
        ExitCode::FAILURE
    } else {
        ExitCode::SUCCESS
    }
}

/// Forwards every build-side effect to stdout instead of a real CMake
/// generation backend. Good enough to watch a script drive `project`,
/// `library` and `executable` calls without wiring up an actual build.
struct PrintingFacade {
    fatal: Cell<bool>,
    directory: RefCell<String>,
}

impl PrintingFacade {
    fn new() -> Self {
        Self {
            fatal: Cell::new(false),
            directory: RefCell::new(".".to_string()),
        }
    }
}

impl CmakeFacade for PrintingFacade {
    fn get_cmake_version(&self) -> cmsl::value::InstanceValue {
        cmsl::value::InstanceValue::Version(cmsl::value::VersionValue {
            major: 3,
            minor: 28,
            patch: 0,
            tweak: 0,
        })
    }

    fn message(&self, text: &str) {
        println!("message: {text}");
    }

    fn warning(&self, text: &str) {
        println!("warning: {text}");
    }

    fn error(&self, text: &str) {
        println!("error: {text}");
    }

    fn fatal_error(&self, text: &str) {
        self.fatal.set(true);
        println!("fatal error: {text}");
    }

    fn did_fatal_error_occur(&self) -> bool {
        self.fatal.get()
    }

    fn register_project(&self, name: &str) {
        println!("project({name})");
    }

    fn install(&self, name: &str) {
        println!("install({name})");
    }

    fn current_binary_dir(&self) -> String {
        self.directory.borrow().clone()
    }

    fn current_source_dir(&self) -> String {
        self.directory.borrow().clone()
    }

    fn add_executable(&self, name: &str, sources: &[String]) {
        println!("add_executable({name}, {sources:?})");
    }

    fn add_library(&self, name: &str, sources: &[String]) {
        println!("add_library({name}, {sources:?})");
    }

    fn target_link_library(&self, target: &str, visibility: Visibility, other: &str) {
        println!("target_link_library({target}, {visibility:?}, {other})");
    }

    fn target_include_directories(&self, target: &str, visibility: Visibility, dirs: &[String]) {
        println!("target_include_directories({target}, {visibility:?}, {dirs:?})");
    }

    fn target_compile_definitions(&self, target: &str, defs: &[String], visibility: Visibility) {
        println!("target_compile_definitions({target}, {defs:?}, {visibility:?})");
    }

    fn current_directory(&self) -> String {
        self.directory.borrow().clone()
    }

    fn go_into_subdirectory(&self, name: &str) {
        self.directory.borrow_mut().push('/');
        self.directory.borrow_mut().push_str(name);
    }

    fn go_directory_up(&self) {
        let mut dir = self.directory.borrow_mut();
        if let Some(pos) = dir.rfind('/') {
            dir.truncate(pos);
        }
    }

    fn enable_ctest(&self) {
        println!("enable_ctest()");
    }

    fn add_test(&self, name: &str) {
        println!("add_test({name})");
    }

    fn get_cxx_compiler_info(&self) -> CxxCompilerInfo {
        CxxCompilerInfo {
            id: "clang".to_string(),
            version: "17.0.0".to_string(),
        }
    }

    fn try_get_extern_define(&self, _name: &str) -> Option<String> {
        None
    }

    fn set_property(&self, key: &str, value: &str) {
        println!("set_property({key}, {value})");
    }
}
