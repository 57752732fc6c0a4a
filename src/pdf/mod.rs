mod typst;

pub use typst::generate_bill_pdf;
