//! PDF writer — applies pagination draw calls to one embedded image.
//!
//! The image is embedded once as an XObject and referenced from every page; each page
//! draws it at a different vertical offset and the media box clips the rest.

use std::io::Write;

use flate2::write::ZlibEncoder;
use flate2::Compression;
use pdf_writer::{Content, Filter, Finish, Name, Pdf, Rect, Ref};
use tracing::{debug, info};

use crate::layout::{paginate, DrawCall, PageGeometry, EXPORT_PAGE};
use crate::render::surface::RenderSurface;
use crate::render::ExportError;

/// Download name for exported documents.
pub const EXPORT_FILENAME: &str = "AI_Smart_Document.pdf";

/// Page geometry is in millimetres; PDF user space is in points.
const MM_TO_PT: f64 = 72.0 / 25.4;

const IMAGE_NAME: Name<'static> = Name(b"Im0");

/// Upper bound on pages per export. Taller surfaces are rejected before any PDF work.
pub const MAX_EXPORT_PAGES: usize = 100;

/// Paginates `surface` onto fixed 210 × 295 mm pages and returns the PDF bytes.
pub fn export_to_pdf(surface: &RenderSurface) -> Result<Vec<u8>, ExportError> {
    let pagination = paginate(
        f64::from(surface.width()),
        f64::from(surface.height()),
        EXPORT_PAGE,
    );
    info!(
        "Exporting {}x{} surface as {} page(s)",
        surface.width(),
        surface.height(),
        pagination.page_count()
    );
    if pagination.page_count() > MAX_EXPORT_PAGES {
        return Err(ExportError::TooManyPages {
            pages: pagination.page_count(),
            limit: MAX_EXPORT_PAGES,
        });
    }
    write_pdf(surface, &pagination.draw_calls(EXPORT_PAGE), EXPORT_PAGE)
}

/// Writes a PDF with one page per run of draw calls sharing a `page_index`.
///
/// `draw_calls` must be ordered by page, as `Pagination::draw_calls` returns them.
pub fn write_pdf(
    surface: &RenderSurface,
    draw_calls: &[DrawCall],
    page: PageGeometry,
) -> Result<Vec<u8>, ExportError> {
    let mut pdf = Pdf::new();
    let catalog_id = Ref::new(1);
    let page_tree_id = Ref::new(2);
    let image_id = Ref::new(3);
    let mut next_ref_id = 4;

    pdf.catalog(catalog_id).pages(page_tree_id);
    embed_image(&mut pdf, surface, image_id, &mut next_ref_id)?;

    let media_box = Rect::new(
        0.0,
        0.0,
        (page.width * MM_TO_PT) as f32,
        (page.height * MM_TO_PT) as f32,
    );

    let mut page_ids = Vec::new();
    for calls in draw_calls.chunk_by(|a, b| a.page_index == b.page_index) {
        let page_id = Ref::new(next_ref_id);
        let content_id = Ref::new(next_ref_id + 1);
        next_ref_id += 2;

        let mut content = Content::new();
        for call in calls {
            content.save_state();
            content.transform(image_transform(call, page));
            content.x_object(IMAGE_NAME);
            content.restore_state();
        }
        let stream = deflate(&content.finish())?;
        pdf.stream(content_id, &stream).filter(Filter::FlateDecode);

        let mut pdf_page = pdf.page(page_id);
        pdf_page.media_box(media_box);
        pdf_page.parent(page_tree_id);
        pdf_page.contents(content_id);
        pdf_page.resources().x_objects().pair(IMAGE_NAME, image_id);
        pdf_page.finish();

        page_ids.push(page_id);
    }

    pdf.pages(page_tree_id)
        .kids(page_ids.iter().copied())
        .count(page_ids.len() as i32);

    let bytes = pdf.finish();
    debug!("PDF written: {} pages, {} bytes", page_ids.len(), bytes.len());
    Ok(bytes)
}

/// PDF transformation matrix `[a b c d e f]` drawing the unit-square image for `call`.
///
/// Draw calls use a top-left origin with y growing downwards; PDF places the image's
/// bottom-left corner at (e, f) with y growing upwards.
fn image_transform(call: &DrawCall, page: PageGeometry) -> [f32; 6] {
    let bottom = page.height - (call.y + call.height);
    [
        (call.width * MM_TO_PT) as f32,
        0.0,
        0.0,
        (call.height * MM_TO_PT) as f32,
        (call.x * MM_TO_PT) as f32,
        (bottom * MM_TO_PT) as f32,
    ]
}

/// Embeds the surface as a Flate-compressed RGB image XObject, with an SMask for alpha.
fn embed_image(
    pdf: &mut Pdf,
    surface: &RenderSurface,
    image_id: Ref,
    next_ref_id: &mut i32,
) -> Result<(), ExportError> {
    let (rgb, alpha) = if surface.has_alpha() {
        let rgba = surface.image().to_rgba8();
        let pixels = rgba.as_raw();
        let mut rgb = Vec::with_capacity(pixels.len() / 4 * 3);
        let mut alpha = Vec::with_capacity(pixels.len() / 4);
        for chunk in pixels.chunks_exact(4) {
            rgb.extend_from_slice(&chunk[..3]);
            alpha.push(chunk[3]);
        }
        (rgb, Some(alpha))
    } else {
        (surface.image().to_rgb8().into_raw(), None)
    };

    let width = surface.width() as i32;
    let height = surface.height() as i32;

    let smask_id = match alpha {
        Some(alpha) => {
            let smask_id = Ref::new(*next_ref_id);
            *next_ref_id += 1;
            let data = deflate(&alpha)?;
            let mut smask = pdf.image_xobject(smask_id, &data);
            smask.filter(Filter::FlateDecode);
            smask.width(width);
            smask.height(height);
            smask.color_space().device_gray();
            smask.bits_per_component(8);
            Some(smask_id)
        }
        None => None,
    };

    let data = deflate(&rgb)?;
    let mut xobject = pdf.image_xobject(image_id, &data);
    xobject.filter(Filter::FlateDecode);
    xobject.width(width);
    xobject.height(height);
    xobject.color_space().device_rgb();
    xobject.bits_per_component(8);
    if let Some(smask_id) = smask_id {
        xobject.s_mask(smask_id);
    }
    Ok(())
}

fn deflate(data: &[u8]) -> Result<Vec<u8>, ExportError> {
    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(data)
        .and_then(|_| encoder.finish())
        .map_err(|e| ExportError::PdfWrite(format!("compression failed: {e}")))
}
