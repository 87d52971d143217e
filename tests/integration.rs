use catgit::output::{OutputFormat, format_result, project_header};
use catgit::{CatgitBuilder, CatgitError, CatgitResult, PatternSet, VcsIgnored, catgit};
use std::fs;
use std::path::Path;
use std::process::Command;
use tempfile::tempdir;

fn tree_body(result: &CatgitResult) -> Vec<&str> {
    result.tree.lines().skip(1).collect()
}

fn run(root: &Path, builder: impl FnOnce(CatgitBuilder) -> CatgitBuilder) -> CatgitResult {
    let options = builder(CatgitBuilder::new(root).respect_vcs_ignore(false)).build();
    catgit(options).unwrap()
}

#[test]
fn integration_text_binary_and_excluded_dir() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "hello\n").unwrap();
    fs::write(dir.path().join("b.bin"), [0u8, 1, 2, 0].repeat(50)).unwrap();
    fs::create_dir(dir.path().join("build")).unwrap();
    fs::write(dir.path().join("build/x.txt"), "artifact").unwrap();

    let result = run(dir.path(), |b| b.excluded_dirs(vec!["build".into()]));

    assert!(result.tree.lines().next().unwrap().ends_with('/'));
    assert_eq!(tree_body(&result), ["├── a.txt", "└── b.bin [Binary/Non-text]"]);
    assert!(!result.tree.contains("build"));
    assert!(!result.content.contains("artifact"));

    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, Path::new("a.txt"));
    assert_eq!(result.files[0].size, 6);
    assert_eq!(result.files[0].lines, 1);
    assert_eq!(
        result.content,
        "==== [ a.txt ] ==== (6 bytes, 1 lines)\n```text\nhello\n```\n"
    );
}

#[test]
fn integration_nested_tree_glyphs() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("src/util")).unwrap();
    fs::write(dir.path().join("src/util/mod.rs"), "").unwrap();
    fs::write(dir.path().join("src/main.rs"), "fn main() {}\n").unwrap();
    fs::write(dir.path().join("README.md"), "# readme\n").unwrap();

    let result = run(dir.path(), |b| b);

    assert_eq!(
        tree_body(&result),
        [
            "├── README.md",
            "└── src/",
            "    ├── main.rs",
            "    └── util/",
            "        └── mod.rs",
        ]
    );
    let paths: Vec<_> = result.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(
        paths,
        [
            Path::new("README.md"),
            Path::new("src/main.rs"),
            Path::new("src/util/mod.rs")
        ]
    );
}

#[test]
fn integration_default_exclusions_prune_nested_dirs() {
    let dir = tempdir().unwrap();
    fs::create_dir_all(dir.path().join("web/node_modules/pkg")).unwrap();
    fs::write(dir.path().join("web/node_modules/pkg/index.js"), "x").unwrap();
    fs::write(dir.path().join("web/app.js"), "app").unwrap();
    fs::create_dir(dir.path().join(".git")).unwrap();
    fs::write(dir.path().join(".git/HEAD"), "ref").unwrap();

    let result = run(dir.path(), |b| b);

    assert!(!result.tree.contains("node_modules"));
    assert!(!result.tree.contains(".git"));
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, Path::new("web/app.js"));
}

#[test]
fn integration_secondary_ignore_display_and_markup() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("debug.log"), "noise").unwrap();
    fs::write(dir.path().join("main.py"), "print(1)\n").unwrap();
    fs::create_dir(dir.path().join("logs")).unwrap();
    fs::write(dir.path().join("logs/today.txt"), "hidden").unwrap();
    let patterns = || PatternSet::from_lines(["*.log", "logs/"]).unwrap();

    let marked = run(dir.path(), |b| b.ignore_patterns(patterns()));
    assert_eq!(
        tree_body(&marked),
        ["├── debug.log [Ignored]", "├── logs/ [Ignored]", "└── main.py"]
    );
    assert_eq!(marked.files.len(), 1);
    assert!(!marked.content.contains("noise"));
    assert!(!marked.content.contains("hidden"));

    let plain = run(dir.path(), |b| b.ignore_patterns(patterns()).markup_ignored(false));
    assert_eq!(tree_body(&plain), ["├── debug.log", "├── logs/", "└── main.py"]);

    let hidden = run(dir.path(), |b| b.ignore_patterns(patterns()).display_ignored(false));
    assert_eq!(tree_body(&hidden), ["└── main.py"]);
    assert_eq!(hidden.content, marked.content);
}

#[test]
fn integration_custom_marker() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.tmp"), "t").unwrap();
    let result = run(dir.path(), |b| {
        b.ignore_patterns(PatternSet::from_lines(["*.tmp"]).unwrap())
            .ignored_marker("(skipped)")
    });
    assert_eq!(tree_body(&result), ["└── a.tmp (skipped)"]);
}

#[test]
fn integration_precomputed_vcs_set() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("secret.env"), "KEY=1").unwrap();
    fs::create_dir(dir.path().join("out")).unwrap();
    fs::write(dir.path().join("out/gen.txt"), "generated").unwrap();
    fs::write(dir.path().join("keep.txt"), "keep\n").unwrap();

    let options = CatgitBuilder::new(dir.path())
        .vcs_ignored(VcsIgnored::from_paths(["secret.env", "out/"]))
        .build();
    let result = catgit(options).unwrap();

    assert_eq!(
        tree_body(&result),
        [
            "├── keep.txt",
            "├── out/ [Ignored]",
            "└── secret.env [Ignored]"
        ]
    );
    assert_eq!(result.files.len(), 1);
    assert!(!result.content.contains("KEY=1"));
}

#[test]
fn integration_allow_list_restricts_tree() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("src")).unwrap();
    fs::write(dir.path().join("src/main.py"), "print('hi')\n").unwrap();
    fs::write(dir.path().join("src/README.md"), "docs").unwrap();
    fs::write(dir.path().join("setup.py"), "setup()").unwrap();
    fs::create_dir(dir.path().join("tests")).unwrap();
    fs::write(dir.path().join("tests/test_main.py"), "assert True").unwrap();

    let result = run(dir.path(), |b| {
        b.include_only(PatternSet::from_lines(["src/*.py"]).unwrap())
    });

    assert_eq!(tree_body(&result), ["└── src/", "    └── main.py"]);
    assert!(!result.tree.contains("README"));
    assert_eq!(result.files.len(), 1);
    assert_eq!(result.files[0].path, Path::new("src/main.py"));
}

#[test]
fn integration_allow_list_still_marks_ignored() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("app.py"), "x = 1\n").unwrap();
    fs::write(dir.path().join("gen.py"), "y = 2\n").unwrap();

    let result = run(dir.path(), |b| {
        b.include_only(PatternSet::from_lines(["*.py"]).unwrap())
            .ignore_patterns(PatternSet::from_lines(["gen.py"]).unwrap())
    });

    assert_eq!(tree_body(&result), ["├── app.py", "└── gen.py [Ignored]"]);
    assert_eq!(result.files.len(), 1);
}

#[test]
fn integration_empty_allow_list_aborts() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    let options = CatgitBuilder::new(dir.path())
        .respect_vcs_ignore(false)
        .include_only(PatternSet::from_lines(["# nothing here", ""]).unwrap())
        .build();
    let err = catgit(options).unwrap_err();
    assert!(matches!(err, CatgitError::EmptyAllowList(_)));
}

#[test]
fn integration_missing_allow_list_file_fails() {
    let dir = tempdir().unwrap();
    let built = CatgitBuilder::new(dir.path()).include_only_file(dir.path().join("nope"));
    assert!(matches!(built, Err(CatgitError::Io { .. })));
}

#[test]
fn integration_invalid_root() {
    let dir = tempdir().unwrap();
    let options = CatgitBuilder::new(dir.path().join("missing")).build();
    assert!(matches!(catgit(options), Err(CatgitError::InvalidRoot(_))));
}

#[test]
fn integration_tree_and_content_agree() {
    let dir = tempdir().unwrap();
    fs::create_dir(dir.path().join("pkg")).unwrap();
    fs::write(dir.path().join("pkg/a.rs"), "a\n").unwrap();
    fs::write(dir.path().join("pkg/b.png"), [0x89u8, 0, 0, 0, 0, 0, 0, 0]).unwrap();
    fs::write(dir.path().join("c.md"), "c\n").unwrap();

    let result = run(dir.path(), |b| b);

    let plain_files: Vec<String> = result
        .tree
        .lines()
        .skip(1)
        .filter(|l| !l.ends_with('/') && !l.ends_with(']'))
        .map(|l| l.rsplit(' ').next().unwrap().to_string())
        .collect();
    let content_files: Vec<String> = result
        .files
        .iter()
        .map(|f| f.path.file_name().unwrap().to_string_lossy().into_owned())
        .collect();
    assert_eq!(plain_files, content_files);
}

#[test]
fn integration_output_is_deterministic() {
    let dir = tempdir().unwrap();
    for i in 0..60 {
        let sub = dir.path().join(format!("d{}", i % 4));
        fs::create_dir_all(&sub).unwrap();
        fs::write(sub.join(format!("f{:02}.txt", i)), "x\n".repeat(i + 1)).unwrap();
    }

    let first = run(dir.path(), |b| b.workers(4));
    let second = run(dir.path(), |b| b.workers(4));

    assert_eq!(first.tree, second.tree);
    assert_eq!(first.files, second.files);
    assert_eq!(first.content, second.content);
    let mut sorted = first.files.iter().map(|f| f.path.clone()).collect::<Vec<_>>();
    sorted.sort();
    let walked: Vec<_> = first.files.iter().map(|f| f.path.clone()).collect();
    assert_eq!(walked, sorted);
}

#[test]
fn integration_without_tree_and_delimiter() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    let result = run(dir.path(), |b| b.include_tree(false).delimiter(""));
    assert!(result.tree.is_empty());
    assert_eq!(result.content, "==== [ a.txt ] ==== (1 bytes, 0 lines)\na\n");

    let text = format_result(&result, OutputFormat::Text, Some("Project URL: x")).unwrap();
    assert_eq!(text, format!("Project URL: x\n\n{}", result.content));
}

#[test]
fn integration_json_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("main.rs"), "fn main() {}").unwrap();
    let result = run(dir.path(), |b| b);
    let json = format_result(&result, OutputFormat::Json, None).unwrap();
    let parsed: CatgitResult = serde_json::from_str(&json).unwrap();
    assert_eq!(parsed.files, result.files);
    assert_eq!(parsed.tree, result.tree);
}

fn git(dir: &Path, args: &[&str]) -> bool {
    Command::new("git")
        .args(args)
        .current_dir(dir)
        .output()
        .map(|out| out.status.success())
        .unwrap_or(false)
}

#[test]
fn integration_git_ignored_paths_are_marked() {
    let dir = tempdir().unwrap();
    if !git(dir.path(), &["init", "-q"]) {
        eprintln!("git unavailable, skipping");
        return;
    }
    fs::write(dir.path().join(".gitignore"), "*.tmp\ncache/\n").unwrap();
    fs::write(dir.path().join("keep.txt"), "keep\n").unwrap();
    fs::write(dir.path().join("junk.tmp"), "junk").unwrap();
    fs::create_dir(dir.path().join("cache")).unwrap();
    fs::write(dir.path().join("cache/blob.txt"), "cached").unwrap();

    let result = catgit(CatgitBuilder::new(dir.path()).build()).unwrap();

    assert_eq!(
        tree_body(&result),
        [
            "├── .gitignore",
            "├── cache/ [Ignored]",
            "├── junk.tmp [Ignored]",
            "└── keep.txt"
        ]
    );
    assert_eq!(result.files.len(), 2);
    assert!(!result.content.contains("cached"));

    let ignored = VcsIgnored::query(dir.path()).unwrap();
    assert!(ignored.is_ignored(Path::new("cache/blob.txt")));
    assert!(!ignored.is_ignored(Path::new("keep.txt")));
}

#[test]
fn integration_git_directory_of_ignored_files_is_listed() {
    let dir = tempdir().unwrap();
    if !git(dir.path(), &["init", "-q"]) {
        eprintln!("git unavailable, skipping");
        return;
    }
    fs::write(dir.path().join(".gitignore"), "*.log\n").unwrap();
    fs::create_dir_all(dir.path().join("logs/old")).unwrap();
    fs::write(dir.path().join("logs/a.log"), "a").unwrap();
    fs::write(dir.path().join("logs/old/b.log"), "b").unwrap();

    let ignored = VcsIgnored::query(dir.path()).unwrap();
    assert!(!ignored.is_ignored(Path::new("logs")));
    assert!(!ignored.is_ignored(Path::new("logs/old")));
    assert!(ignored.is_ignored(Path::new("logs/a.log")));
    assert!(ignored.is_ignored(Path::new("logs/old/b.log")));

    let marked = catgit(CatgitBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(
        tree_body(&marked),
        [
            "├── .gitignore",
            "└── logs/",
            "    ├── a.log [Ignored]",
            "    └── old/",
            "        └── b.log [Ignored]",
        ]
    );

    let hidden = catgit(CatgitBuilder::new(dir.path()).display_ignored(false).build()).unwrap();
    assert_eq!(
        tree_body(&hidden),
        ["├── .gitignore", "└── logs/", "    └── old/"]
    );
    assert_eq!(hidden.files.len(), 1);
}

#[test]
fn integration_project_header_leads_text_output() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a\n").unwrap();
    let result = run(dir.path(), |b| b);
    let version = env!("CARGO_PKG_VERSION");

    let header = project_header(Some("git@example.com:me/proj.git"));
    assert_eq!(
        header,
        format!("[ catgit v{} | Project URL: git@example.com:me/proj.git ]", version)
    );
    let text = format_result(&result, OutputFormat::Text, Some(&header)).unwrap();
    assert_eq!(
        text,
        format!("{}\n\n{}\n\n{}", header, result.tree, result.content)
    );

    assert_eq!(project_header(None), format!("[ catgit v{} ]", version));
}

#[test]
fn integration_not_a_repository_degrades() {
    let dir = tempdir().unwrap();
    fs::write(dir.path().join("a.txt"), "a").unwrap();
    let result = catgit(CatgitBuilder::new(dir.path()).build()).unwrap();
    assert_eq!(result.files.len(), 1);
    assert_eq!(tree_body(&result), ["└── a.txt"]);
}
