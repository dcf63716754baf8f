//! Template rendering: `{{path}[:format]}` token substitution.

use std::fs;

use dpml::Dpml;

fn interpreter() -> Dpml {
    let mut dpml = Dpml::from_text(
        "name str = 'Tina'\n\
         body\n  \
           weight float = 62.3 kg\n  \
           height float = 177 cm\n\
         age int = 30 a\n\
         gender str = 'woman'\n  \
           = 'woman'\n  \
           = 'man'",
    );
    dpml.initialize().expect("parse should succeed");
    dpml
}

#[test]
fn test_template_substitution() {
    let rendered = interpreter()
        .template(
            "Name:   {{?name}:s}\n\
             Weight: {{?body.weight}:.3e}\n\
             Height: {{?body.height}}\n\
             Age:    {{?age}}\n\
             Gender: {{?gender}}",
        )
        .unwrap();
    assert_eq!(
        rendered,
        "Name:   Tina\n\
         Weight: 6.230e+01\n\
         Height: 177.0\n\
         Age:    30\n\
         Gender: woman"
    );
}

#[test]
fn test_literal_braces_pass_through() {
    let rendered = interpreter().template("W={?body.weight} {a,b} {}").unwrap();
    assert_eq!(rendered, "W={?body.weight} {a,b} {}");
}

#[test]
fn test_unresolved_token_fails() {
    assert!(interpreter().template("{{?missing}}").is_err());
}

#[test]
fn test_template_file_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let tpl = dir.path().join("report.tpl");
    let out = dir.path().join("report.txt");
    fs::write(&tpl, "W = {{?body.weight}:.1f} kg\n").unwrap();
    let rendered = interpreter()
        .template_file(
            tpl.to_string_lossy().as_ref(),
            Some(out.to_string_lossy().as_ref()),
        )
        .unwrap();
    assert_eq!(rendered, "W = 62.3 kg\n");
    assert_eq!(fs::read_to_string(&out).unwrap(), "W = 62.3 kg\n");
}
