use std::path::Path;
use std::process::Command;

use tracing::debug;

use crate::bill::BillData;
use crate::error::{LogisticsError, Result};

/// Embedded Typst template for monthly bills
/// Uses a placeholder that gets replaced with the actual JSON file path
const BILL_TEMPLATE: &str = r##"// Monthly Bill Template
// Data is loaded from JSON file

#let data = json("DATA_JSON_PATH")

#set page(
  paper: "a4",
  margin: (top: 2cm, bottom: 2cm, left: 2cm, right: 2cm),
)

#set text(size: 10pt)

// Indian digit grouping: 12,34,567
#let fmt-int(digits) = {
  let len = digits.len()
  let out = ""
  for (i, digit) in digits.clusters().enumerate() {
    let rest = len - i
    if i > 0 and (rest == 3 or (rest > 3 and calc.rem(rest - 3, 2) == 0)) {
      out += ","
    }
    out += digit
  }
  out
}

#let fmt-currency(amount) = {
  let parts = str(calc.round(amount, digits: 2)).split(".")
  let whole = fmt-int(parts.at(0))
  let frac = if parts.len() > 1 { parts.at(1) } else { "00" }
  let frac2 = if frac.len() == 1 { frac + "0" } else { frac }
  data.currency_symbol + whole + "." + frac2
}

// Header with bill number and company info
#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(size: 24pt, weight: "bold")[INVOICE]
    #v(0.3em)
    #text(size: 12pt, fill: gray)[\##data.number]
  ],
  [
    #text(size: 16pt, weight: "bold")[#data.company.name]
    #v(0.3em)
    #data.company.address
    #if data.company.gst_no != none [
      \ GST: #data.company.gst_no
    ]
  ]
)

#v(1em)
#line(length: 100%, stroke: 0.5pt + gray)
#v(1em)

#grid(
  columns: (1fr, 1fr),
  align: (left, right),
  [
    #text(weight: "bold", size: 11pt)[Bill To:]
    #v(0.3em)
    #data.bill_to
  ],
  [
    #text(weight: "bold", size: 11pt)[Invoice Date:]
    #v(0.3em)
    #data.date
    #v(0.6em)
    #text(weight: "bold", size: 11pt)[Period:]
    #v(0.3em)
    #data.period
  ]
)

#v(1.5em)

// Trip lines
#table(
  columns: (auto, auto, 1fr, auto, 1fr, auto, auto),
  align: (center, left, left, left, left, right, right),
  stroke: 0.5pt + gray,
  inset: 6pt,
  fill: (x, y) => if y == 0 { luma(240) } else { none },

  // Header
  [*SR.*], [*Date*], [*Particular*], [*Vehicle*], [*Route*], [*Qty*], [*Amount*],

  ..data.lines.map(line => (
    str(line.index),
    line.date,
    line.particular,
    raw(line.vehicle_no),
    line.route,
    str(line.quantity),
    if line.amount != none { fmt-currency(line.amount) } else { [--] },
  )).flatten()
)

#v(1em)

// Totals
#align(right)[
  #table(
    columns: (auto, auto),
    stroke: none,
    align: (right, right),
    inset: 6pt,

    [Subtotal:], [#fmt-currency(data.subtotal)],
    [GST (#str(calc.round(data.tax_rate, digits: 2))%):], [#fmt-currency(data.tax_amount)],

    table.hline(stroke: 1pt),
    [*Total:*], [*#fmt-currency(data.total)*],
  )
]

#v(3em)

#align(right)[
  For #data.company.name
  #v(2.5em)
  Authorised Signatory
]
"##;

/// Generate a bill PDF using the Typst CLI
pub fn generate_bill_pdf(bill: &BillData, output_path: &Path) -> Result<()> {
    // Check if typst is available
    let typst_check = Command::new("typst").arg("--version").output();

    if typst_check.is_err() {
        return Err(LogisticsError::TypstNotFound);
    }

    // Create temp directory for template
    let temp_dir = std::env::temp_dir().join("logistics-cli");
    std::fs::create_dir_all(&temp_dir)?;

    // Serialize bill data to JSON
    let json_data =
        serde_json::to_string(bill).map_err(|e| LogisticsError::PdfGeneration(e.to_string()))?;

    // Write JSON to temp file
    let json_path = temp_dir.join("bill_data.json");
    std::fs::write(&json_path, &json_data)?;

    // Write template with relative JSON path (bill_data.json is in same directory)
    let template_content = BILL_TEMPLATE.replace("DATA_JSON_PATH", "bill_data.json");
    let template_path = temp_dir.join("bill.typ");
    std::fs::write(&template_path, &template_content)?;

    debug!(number = %bill.number, output = %output_path.display(), "compiling bill");

    // Run typst compile with root set to temp directory
    let output = Command::new("typst")
        .arg("compile")
        .arg("--root")
        .arg(&temp_dir)
        .arg(&template_path)
        .arg(output_path)
        .output()?;

    if !output.status.success() {
        let stderr = String::from_utf8_lossy(&output.stderr);
        return Err(LogisticsError::PdfGeneration(stderr.to_string()));
    }

    // Clean up temp files
    let _ = std::fs::remove_file(&template_path);
    let _ = std::fs::remove_file(&json_path);

    Ok(())
}
