use super::{resolve_overwrite, runtime};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::InvoiceEditor;
use crate::errors::{AppError, AppResult};
use crate::export::{
    ExportController, ExportState, GenerateOutcome, Launcher, ShareOutcome, SystemLauncher,
    export_file_name, notify_export_success, print_preview,
};
use crate::models::InvoiceDraft;
use crate::ui::messages::{ask, error, header, info, success, warning};
use crate::utils::date;
use crate::utils::formatting::{bold, format_quantity, money};
use crate::utils::table::{Column, Table};
use chrono::NaiveDate;
use std::path::Path;
use tokio::runtime::Runtime;

const HELP: &str = "\
Commands:
  to <name>                  set the recipient (\"Issued To\")
  desc <text>                set the description of the new item
  qty <n>                    set the quantity of the new item
  price <n>                  set the unit price of the new item
  add                        add the new item to the invoice
  item <qty> <price> <text>  add an item in one go
  rm <no>                    remove item number <no>
  show                       print the invoice
  total                      print the grand total
  date <YYYY-MM-DD>          set the issue date
  export                     render the invoice and open the PDF preview
  preview                    reopen the last preview
  download [--force]         save the previewed PDF
  cancel                     close the preview
  share                      share the total via WhatsApp
  save <file> / load <file>  write or read the draft as JSON
  help                       show this help
  quit                       leave (the draft is discarded)";

#[derive(Debug, PartialEq)]
enum Flow {
    Continue,
    Quit,
}

struct Session<'a> {
    cfg: &'a Config,
    editor: InvoiceEditor,
    controller: ExportController,
    date: NaiveDate,
    rt: Runtime,
}

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Shell { draft } = cmd {
        let editor = match draft {
            Some(path) => InvoiceEditor::with_draft(InvoiceDraft::load(path)?),
            None => InvoiceEditor::new(),
        };

        let mut session = Session {
            cfg,
            editor,
            controller: ExportController::with_config(cfg),
            date: date::today(),
            rt: runtime()?,
        };

        header("rInvoice");
        info("Type `help` for the list of commands.");

        while let Some(line) = ask("rinvoice>") {
            match session.execute(&line) {
                Ok(Flow::Quit) => break,
                Ok(Flow::Continue) => {}
                Err(e) => error(e),
            }
        }
    }
    Ok(())
}

impl Session<'_> {
    fn execute(&mut self, line: &str) -> AppResult<Flow> {
        let line = line.trim();
        let (cmd, rest) = line.split_once(char::is_whitespace).unwrap_or((line, ""));
        let rest = rest.trim();

        match cmd {
            "" => {}
            "help" | "?" => println!("{HELP}"),
            "quit" | "exit" => return Ok(Flow::Quit),
            "to" => {
                self.editor.set_recipient(rest);
                self.draft_changed();
            }
            "desc" => self.editor.entry.set_description(rest),
            "qty" => self.editor.entry.set_quantity(rest),
            "price" => self.editor.entry.set_price(rest),
            "add" => {
                if self.editor.submit_entry() {
                    self.draft_changed();
                    success("Item added.");
                } else {
                    warning("Description, quantity and price are all required.");
                }
            }
            "item" => self.quick_item(rest)?,
            "rm" => {
                let no: u32 = rest
                    .parse()
                    .map_err(|_| AppError::InvalidItem(format!("'{rest}' is not an item number")))?;
                if self.editor.remove_item(no) {
                    self.draft_changed();
                    success(format!("Item {no} removed."));
                } else {
                    warning(format!("No item number {no}."));
                }
            }
            "show" => self.show(),
            "total" => println!(
                "{} {}",
                bold("GRAND TOTAL"),
                money(&self.cfg.currency, self.editor.grand_total())
            ),
            "date" => {
                self.date =
                    date::parse_date(rest).ok_or_else(|| AppError::InvalidDate(rest.to_string()))?;
                self.draft_changed();
            }
            "export" => self.export()?,
            "preview" => match self.controller.reopen_preview()? {
                Some(p) => print_preview(&p),
                None => warning("Nothing to preview; run `export` first."),
            },
            "download" => self.download(rest == "--force")?,
            "cancel" => {
                if self.controller.state() == ExportState::Previewing {
                    self.controller.cancel_export();
                    info("Preview closed.");
                }
            }
            "share" => self.share()?,
            "save" => {
                self.editor.draft().save(Path::new(rest))?;
                success(format!("Draft saved to {rest}"));
            }
            "load" => {
                let draft = InvoiceDraft::load(Path::new(rest))?;
                self.editor.replace_draft(draft);
                self.draft_changed();
                success(format!("Draft loaded from {rest}"));
            }
            other => warning(format!("Unknown command '{other}'. Type `help`.")),
        }
        Ok(Flow::Continue)
    }

    /// A snapshot of an older draft must never be downloaded.
    fn draft_changed(&self) {
        if self.controller.has_artifact() {
            self.controller.discard();
        }
    }

    fn quick_item(&mut self, rest: &str) -> AppResult<()> {
        let mut parts = rest.splitn(3, char::is_whitespace);
        let (Some(qty), Some(price), Some(desc)) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(AppError::InvalidItem(
                "usage: item <qty> <price> <description>".to_string(),
            ));
        };

        let entry = &mut self.editor.entry;
        entry.set_quantity(qty);
        entry.set_price(price);
        entry.set_description(desc);
        if self.editor.submit_entry() {
            self.draft_changed();
            success("Item added.");
        } else {
            warning("Description, quantity and price are all required.");
        }
        Ok(())
    }

    fn show(&self) {
        let draft = self.editor.draft();
        let cur = &self.cfg.currency;
        let to = if draft.recipient_name.is_empty() {
            "---"
        } else {
            draft.recipient_name.as_str()
        };

        header(&self.cfg.invoice_title);
        println!(
            "Date Issued: {}   Invoice No.: {}   Issued To: {}\n",
            date::issued(self.date),
            self.cfg.invoice_number,
            to
        );

        let mut table = Table::new(vec![
            Column::left("NO"),
            Column::left("DESCRIPTION"),
            Column::right("QTY"),
            Column::right("PRICE"),
            Column::right("SUBTOTAL"),
        ]);
        for item in &draft.items {
            table.add_row(vec![
                item.sequence_number.to_string(),
                item.description.clone(),
                format_quantity(item.quantity),
                money(cur, item.unit_price),
                money(cur, item.subtotal()),
            ]);
        }
        print!("{}", table.render());
        println!("{} {}", bold("GRAND TOTAL"), money(cur, draft.grand_total()));
    }

    fn export(&mut self) -> AppResult<()> {
        let view = self.editor.render_view(self.cfg, self.date);
        let outcome = self.rt.block_on(self.controller.generate_export(Some(&view)))?;
        if let GenerateOutcome::Previewing(p) = outcome {
            print_preview(&p);
            if self.cfg.open_preview {
                if let Err(e) = SystemLauncher.open(&p.path.to_string_lossy()) {
                    warning(format!("Preview not opened: {e}"));
                }
            }
            info("Type `download` to save it or `cancel` to close the preview.");
        }
        Ok(())
    }

    fn download(&self, force: bool) -> AppResult<()> {
        if !self.controller.has_artifact() {
            warning("Nothing to download; run `export` first.");
            return Ok(());
        }

        let summary = self.editor.summary();
        let target = self
            .cfg
            .output_dir
            .join(export_file_name(&summary.recipient_name, self.date));
        let Some(force) = resolve_overwrite(&target, force) else {
            info("Download cancelled: existing file not overwritten.");
            return Ok(());
        };

        // the grace-period release runs on the session runtime's worker
        let _enter = self.rt.enter();
        match self
            .controller
            .confirm_export(&summary, self.date, &self.cfg.output_dir, force)?
        {
            Some(saved) => notify_export_success(&saved),
            None => warning("Nothing to download; run `export` first."),
        }
        Ok(())
    }

    fn share(&self) -> AppResult<()> {
        let view = self.editor.render_view(self.cfg, self.date);
        let summary = self.editor.summary();
        let outcome = self.rt.block_on(self.controller.share_via_messaging(
            Some(&view),
            &summary,
            &SystemLauncher,
        ))?;

        match outcome {
            ShareOutcome::Captured(GenerateOutcome::Previewing(p)) => {
                print_preview(&p);
                info("Invoice captured. Run `share` again to open WhatsApp.");
            }
            ShareOutcome::Captured(GenerateOutcome::NoTarget) => {}
            ShareOutcome::Opened(url) => success(format!("WhatsApp link opened: {url}")),
        }
        Ok(())
    }
}
