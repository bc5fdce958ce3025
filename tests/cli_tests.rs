mod common;
use common::{is_pdf, rinv, scratch, write_config};
use predicates::prelude::*;
use std::fs;

#[test]
fn test_export_writes_named_pdf() {
    let dir = scratch();
    let out = dir.path().join("out");
    let cfg = write_config(dir.path(), &out);

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "export"])
        .args(["--to", "Ali Bin Ahmad"])
        .args(["--item", "Consulting;2;100", "--item", "Materials;1;50"])
        .args(["--date", "2025-03-17", "--yes"])
        .assert()
        .success()
        .stdout(predicate::str::contains("InvoiceAliBinAhmad_250317.pdf"));

    let pdf = out.join("InvoiceAliBinAhmad_250317.pdf");
    assert!(is_pdf(&fs::read(pdf).unwrap()));
}

#[test]
fn test_export_without_recipient_is_untitled() {
    let dir = scratch();
    let cfg = write_config(dir.path(), dir.path());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "export", "--date", "2025-03-17", "--yes"])
        .assert()
        .success();

    assert!(dir.path().join("InvoiceUntitled_250317.pdf").exists());
}

#[test]
fn test_export_out_flag_overrides_config() {
    let dir = scratch();
    let elsewhere = scratch();
    let cfg = write_config(dir.path(), dir.path());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "export", "--to", "Siti"])
        .args(["--item", "Tent;1;80", "--date", "2025-12-01", "--yes"])
        .args(["--out", elsewhere.path().to_str().unwrap()])
        .assert()
        .success();

    assert!(elsewhere.path().join("InvoiceSiti_251201.pdf").exists());
    assert!(!dir.path().join("InvoiceSiti_251201.pdf").exists());
}

#[test]
fn test_export_rejects_bad_date() {
    let dir = scratch();
    let cfg = write_config(dir.path(), dir.path());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "export", "--date", "17/03/2025", "--yes"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("Invalid date format"));
}

#[test]
fn test_export_reports_skipped_items() {
    let dir = scratch();
    let cfg = write_config(dir.path(), dir.path());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "export", "--date", "2025-03-17", "--yes"])
        .args(["--item", "Free sample;1;0"])
        .assert()
        .success()
        .stdout(predicate::str::contains("Skipped item"));
}

#[test]
fn test_share_prints_link() {
    let dir = scratch();
    let cfg = write_config(dir.path(), dir.path());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "share", "--print-only"])
        .args(["--to", "Ali", "--item", "Consulting;2;100"])
        .assert()
        .success()
        .stdout(predicate::str::contains(
            "https://wa.me/?text=Invoice%20details%3A%0AIssued%20to%3A%20Ali%0ATotal%20Amount%3A%20RM200.00",
        ));
}

#[test]
fn test_shell_edit_session() {
    let dir = scratch();
    let cfg = write_config(dir.path(), dir.path());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "shell"])
        .write_stdin(
            "to Ali Bin Ahmad\n\
             item 2 100 Consulting\n\
             desc Materials\nqty 1\nprice 50\nadd\n\
             total\n\
             rm 1\n\
             show\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("RM250.00"))
        .stdout(predicate::str::contains("1  Materials"))
        .stdout(predicate::str::contains("GRAND TOTAL").and(predicate::str::contains("RM50.00")));
}

#[test]
fn test_shell_export_cancel_reopen_download() {
    let dir = scratch();
    let cfg = write_config(dir.path(), dir.path());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "shell"])
        .write_stdin(
            "to Ali Bin Ahmad\n\
             item 2 100 Consulting\n\
             date 2025-03-17\n\
             export\n\
             cancel\n\
             preview\n\
             download\n\
             quit\n",
        )
        .assert()
        .success()
        .stdout(predicate::str::contains("Preview PDF"))
        .stdout(predicate::str::contains("Invoice saved"));

    assert!(dir.path().join("InvoiceAliBinAhmad_250317.pdf").exists());
}

#[test]
fn test_shell_download_after_edit_needs_new_export() {
    let dir = scratch();
    let cfg = write_config(dir.path(), dir.path());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "shell"])
        .write_stdin("item 1 10 Pens\nexport\nitem 1 5 Paper\ndownload\n")
        .assert()
        .success()
        .stdout(predicate::str::contains("Nothing to download"));
}

#[test]
fn test_shell_save_then_export_from_draft() {
    let dir = scratch();
    let cfg = write_config(dir.path(), dir.path());
    let draft = dir.path().join("draft.json");

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "shell"])
        .write_stdin(format!(
            "to Nur\nitem 3 20 Banner\nsave {}\nquit\n",
            draft.display()
        ))
        .assert()
        .success();

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "export", "--yes", "--date", "2025-01-02"])
        .args(["--draft", draft.to_str().unwrap()])
        .assert()
        .success();

    assert!(dir.path().join("InvoiceNur_250102.pdf").exists());
}

#[test]
fn test_init_and_print_config() {
    let dir = scratch();
    let cfg = dir.path().join("nested").join("rinvoice.conf");

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "init"])
        .assert()
        .success();
    assert!(cfg.exists());

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "config", "--print"])
        .assert()
        .success()
        .stdout(predicate::str::contains("currency: RM"))
        .stdout(predicate::str::contains("wa.me"));
}

#[test]
fn test_broken_config_is_reported() {
    let dir = scratch();
    let cfg = dir.path().join("rinvoice.conf");
    fs::write(&cfg, "capture:\n  scale: -2\n").unwrap();

    rinv()
        .args(["--config", cfg.to_str().unwrap(), "share", "--print-only"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("capture.scale"));
}
