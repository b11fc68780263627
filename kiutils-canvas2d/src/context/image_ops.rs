//! Image drawing, pixel data, and PNG output operations for Canvas2dContext.

use super::Canvas2dContext;
use crate::error::{Canvas2dError, Canvas2dResult};
use crate::geometry::CanvasPixmapRef;
use tiny_skia::Transform;

impl Canvas2dContext {
    /// Draw a premultiplied-alpha pixmap scaled into the destination rectangle.
    ///
    /// Honors global alpha and the active clip. A buffer whose length does
    /// not match `width * height * 4` is rejected.
    pub fn draw_image_scaled(
        &mut self,
        image: CanvasPixmapRef,
        dx: f32,
        dy: f32,
        dw: f32,
        dh: f32,
    ) -> Canvas2dResult<()> {
        log::debug!(
            target: "canvas",
            "drawImage {}x{} into {} {} {} {}",
            image.width, image.height, dx, dy, dw, dh
        );
        let pixmap = tiny_skia::PixmapRef::from_bytes(image.data, image.width, image.height)
            .ok_or(Canvas2dError::InvalidImage {
                width: image.width,
                height: image.height,
                len: image.data.len(),
            })?;

        if dw <= 0.0 || dh <= 0.0 {
            return Ok(());
        }

        let paint = tiny_skia::PixmapPaint {
            opacity: self.state.global_alpha,
            quality: tiny_skia::FilterQuality::Bilinear,
            ..Default::default()
        };

        let scale_x = dw / image.width as f32;
        let scale_y = dh / image.height as f32;
        let transform = Transform::from_translate(dx, dy).pre_scale(scale_x, scale_y);

        let clip_mask = self.create_clip_mask();
        self.pixmap
            .draw_pixmap(0, 0, pixmap, &paint, transform, clip_mask.as_ref());
        Ok(())
    }

    /// Get straight-alpha RGBA data for a region of the canvas.
    ///
    /// Pixels outside the canvas read as transparent black.
    pub fn get_image_data(&self, x: i32, y: i32, width: u32, height: u32) -> Vec<u8> {
        let mut data = vec![0u8; (width * height * 4) as usize];

        for dy in 0..height {
            for dx in 0..width {
                let src_x = x + dx as i32;
                let src_y = y + dy as i32;
                if src_x < 0 || src_y < 0 {
                    continue;
                }
                let Some(pixel) = self.pixmap.pixel(src_x as u32, src_y as u32) else {
                    continue;
                };
                let c = pixel.demultiply();
                let dst_idx = ((dy * width + dx) * 4) as usize;
                data[dst_idx..dst_idx + 4]
                    .copy_from_slice(&[c.red(), c.green(), c.blue(), c.alpha()]);
            }
        }

        data
    }

    /// Straight-alpha RGBA value of a single pixel, if it lies on the canvas.
    pub fn pixel(&self, x: u32, y: u32) -> Option<[u8; 4]> {
        let c = self.pixmap.pixel(x, y)?.demultiply();
        Some([c.red(), c.green(), c.blue(), c.alpha()])
    }

    /// Export the canvas as PNG data.
    ///
    /// `ppi` sets the pixel density metadata and defaults to 72.
    pub fn to_png(&self, ppi: Option<f32>) -> Canvas2dResult<Vec<u8>> {
        let ppi = ppi.unwrap_or(72.0);

        let mut buf = Vec::new();
        {
            let mut encoder = png::Encoder::new(&mut buf, self.width, self.height);
            encoder.set_color(png::ColorType::Rgba);
            encoder.set_depth(png::BitDepth::Eight);

            // Pixels per meter
            let ppm = (ppi.max(0.0) / 0.0254).round() as u32;
            encoder.set_pixel_dims(Some(png::PixelDimensions {
                xppu: ppm,
                yppu: ppm,
                unit: png::Unit::Meter,
            }));

            let mut writer = encoder.write_header()?;
            let data = self.get_image_data(0, 0, self.width, self.height);
            writer.write_image_data(&data)?;
        }
        Ok(buf)
    }
}

#[cfg(test)]
mod tests {
    use crate::geometry::CanvasPixmapRef;
    use crate::{Canvas2dContext, Canvas2dError, FontConfig};

    fn test_context(width: u32, height: u32) -> Canvas2dContext {
        let config = FontConfig {
            load_system_fonts: false,
            ..FontConfig::default()
        };
        Canvas2dContext::with_config(width, height, config).unwrap()
    }

    #[test]
    fn test_draw_image_scaled_fills_destination() {
        let mut ctx = test_context(20, 20);
        // 2x2 opaque red source
        let data = [255u8, 0, 0, 255].repeat(4);
        let image = CanvasPixmapRef {
            data: &data,
            width: 2,
            height: 2,
        };
        ctx.draw_image_scaled(image, 0.0, 0.0, 20.0, 20.0).unwrap();
        assert_eq!(ctx.pixel(10, 10), Some([255, 0, 0, 255]));
        assert_eq!(ctx.pixel(19, 19), Some([255, 0, 0, 255]));
    }

    #[test]
    fn test_draw_image_rejects_short_buffer() {
        let mut ctx = test_context(4, 4);
        let data = vec![0u8; 7];
        let image = CanvasPixmapRef {
            data: &data,
            width: 2,
            height: 2,
        };
        assert!(matches!(
            ctx.draw_image_scaled(image, 0.0, 0.0, 4.0, 4.0),
            Err(Canvas2dError::InvalidImage { len: 7, .. })
        ));
    }

    #[test]
    fn test_get_image_data_out_of_bounds_is_transparent() {
        let mut ctx = test_context(2, 2);
        ctx.set_fill_style("#ffffff").unwrap();
        ctx.fill_rect(&crate::RectParams {
            x: 0.0,
            y: 0.0,
            width: 2.0,
            height: 2.0,
        });
        let data = ctx.get_image_data(-1, 0, 2, 1);
        assert_eq!(&data[0..4], &[0, 0, 0, 0]);
        assert_eq!(&data[4..8], &[255, 255, 255, 255]);
    }

    #[test]
    fn test_to_png_signature() {
        let ctx = test_context(3, 3);
        let png = ctx.to_png(None).unwrap();
        assert_eq!(&png[..8], b"\x89PNG\r\n\x1a\n");
    }
}
