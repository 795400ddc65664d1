//! PPTX package assembly.
//!
//! Writes a complete OOXML presentation from a slide deck: content types,
//! package relationships, document properties, theme, master, layouts, one
//! slide part per record, a notes part per slide that carries speaker
//! notes, and decoded media for embedded images.

use std::io::{Cursor, Write};

use zip::write::SimpleFileOptions;
use zip::ZipWriter;

use deckgen_schema::{SlideRecord, ThemeConfig};

use crate::constants::*;
use crate::error::Result;
use crate::media::{decode_data_url, MediaItem};
use crate::shapes::{escape_xml, srgb};
use crate::slide::slide_shapes;

/// PPTX document writer.
pub struct DeckWriter {
    slides: Vec<SlideRecord>,
    theme: ThemeConfig,
    title: Option<String>,
    author: Option<String>,
}

/// Media resolved for one slide: `(media index, rel id)`.
struct SlideMedia {
    item: MediaItem,
    slide_num: usize,
    rel_id: String,
}

impl DeckWriter {
    pub fn new(theme: ThemeConfig) -> Self {
        Self {
            slides: Vec::new(),
            theme,
            title: None,
            author: None,
        }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = Some(title.into());
        self
    }

    pub fn with_author(mut self, author: impl Into<String>) -> Self {
        self.author = Some(author.into());
        self
    }

    pub fn add_slide(&mut self, slide: SlideRecord) {
        self.slides.push(slide);
    }

    pub fn add_slides(&mut self, slides: impl IntoIterator<Item = SlideRecord>) {
        self.slides.extend(slides);
    }

    /// Generate the PPTX as bytes.
    pub fn generate(&self) -> Result<Vec<u8>> {
        let cursor = Cursor::new(Vec::new());
        let mut zip = ZipWriter::new(cursor);
        let options =
            SimpleFileOptions::default().compression_method(zip::CompressionMethod::Deflated);

        let media = self.collect_media();

        self.write_content_types(&mut zip, options)?;
        self.write_root_rels(&mut zip, options)?;
        self.write_app_xml(&mut zip, options)?;
        self.write_core_xml(&mut zip, options)?;
        self.write_presentation_xml(&mut zip, options)?;
        self.write_presentation_rels(&mut zip, options)?;
        self.write_pres_props(&mut zip, options)?;
        self.write_view_props(&mut zip, options)?;
        self.write_theme(&mut zip, options)?;
        self.write_slide_master(&mut zip, options)?;
        self.write_slide_layouts(&mut zip, options)?;

        for (i, slide) in self.slides.iter().enumerate() {
            let slide_num = i + 1;
            let slide_media = media.iter().find(|m| m.slide_num == slide_num);
            self.write_slide(&mut zip, options, slide_num, slide, slide_media)?;
            if slide.notes.is_some() {
                self.write_notes_slide(&mut zip, options, slide_num, slide)?;
            }
        }

        for m in &media {
            zip.start_file(format!("ppt/media/{}", m.item.embedded_name), options)?;
            zip.write_all(&m.item.data)?;
        }

        let cursor = zip.finish()?;
        Ok(cursor.into_inner())
    }

    /// Decode every embeddable image up front. Undecodable payloads are
    /// logged and skipped so one bad image never sinks the export.
    fn collect_media(&self) -> Vec<SlideMedia> {
        let mut out = Vec::new();
        for (i, slide) in self.slides.iter().enumerate() {
            let slide_num = i + 1;
            if let Some(url) = slide.body.image_data_url() {
                match decode_data_url(url, out.len() + 1) {
                    Ok(item) => {
                        // rId1 is the layout, rId2 the notes part when present.
                        let rel_num = if slide.notes.is_some() { 3 } else { 2 };
                        out.push(SlideMedia {
                            item,
                            slide_num,
                            rel_id: format!("rId{}", rel_num),
                        });
                    }
                    Err(e) => {
                        log::warn!("slide {}: dropping embedded image: {}", slide_num, e);
                    }
                }
            }
        }
        out
    }

    fn write_content_types<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("[Content_Types].xml", options)?;

        let mut content = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types">
  <Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/>
  <Default Extension="xml" ContentType="application/xml"/>
  <Default Extension="png" ContentType="image/png"/>
  <Default Extension="jpeg" ContentType="image/jpeg"/>
  <Default Extension="jpg" ContentType="image/jpeg"/>
  <Default Extension="gif" ContentType="image/gif"/>
  <Override PartName="/ppt/presentation.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml"/>
  <Override PartName="/ppt/presProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.presProps+xml"/>
  <Override PartName="/ppt/viewProps.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.viewProps+xml"/>
  <Override PartName="/ppt/theme/theme1.xml" ContentType="application/vnd.openxmlformats-officedocument.theme+xml"/>
  <Override PartName="/ppt/slideMasters/slideMaster1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideMaster+xml"/>
  <Override PartName="/ppt/slideLayouts/slideLayout1.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
  <Override PartName="/ppt/slideLayouts/slideLayout2.xml" ContentType="application/vnd.openxmlformats-officedocument.presentationml.slideLayout+xml"/>
  <Override PartName="/docProps/core.xml" ContentType="application/vnd.openxmlformats-package.core-properties+xml"/>
  <Override PartName="/docProps/app.xml" ContentType="application/vnd.openxmlformats-officedocument.extended-properties+xml"/>
"#,
        );

        for i in 1..=self.slides.len() {
            content.push_str(&format!(
                "  <Override PartName=\"/ppt/slides/slide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.slide+xml\"/>\n",
                i
            ));
            if self.slides[i - 1].notes.is_some() {
                content.push_str(&format!(
                    "  <Override PartName=\"/ppt/notesSlides/notesSlide{}.xml\" ContentType=\"application/vnd.openxmlformats-officedocument.presentationml.notesSlide+xml\"/>\n",
                    i
                ));
            }
        }

        content.push_str("</Types>");
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_root_rels<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("_rels/.rels", options)?;

        let content = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="ppt/presentation.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/package/2006/relationships/metadata/core-properties" Target="docProps/core.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/extended-properties" Target="docProps/app.xml"/>
</Relationships>"#;

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_app_xml<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("docProps/app.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Properties xmlns="http://schemas.openxmlformats.org/officeDocument/2006/extended-properties" xmlns:vt="http://schemas.openxmlformats.org/officeDocument/2006/docPropsVTypes">
  <TotalTime>0</TotalTime>
  <Words>0</Words>
  <Application>deckgen</Application>
  <PresentationFormat>On-screen Show (16:9)</PresentationFormat>
  <Slides>{}</Slides>
  <Notes>{}</Notes>
  <HiddenSlides>0</HiddenSlides>
  <ScaleCrop>false</ScaleCrop>
  <LinksUpToDate>false</LinksUpToDate>
  <SharedDoc>false</SharedDoc>
  <HyperlinksChanged>false</HyperlinksChanged>
  <AppVersion>1.0</AppVersion>
</Properties>"#,
            self.slides.len(),
            self.slides.iter().filter(|s| s.notes.is_some()).count(),
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_core_xml<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("docProps/core.xml", options)?;

        let title = self.title.as_deref().unwrap_or("Presentation");
        let author = self.author.as_deref().unwrap_or("deckgen");

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<cp:coreProperties xmlns:cp="http://schemas.openxmlformats.org/package/2006/metadata/core-properties" xmlns:dc="http://purl.org/dc/elements/1.1/" xmlns:dcterms="http://purl.org/dc/terms/" xmlns:dcmitype="http://purl.org/dc/dcmitype/" xmlns:xsi="http://www.w3.org/2001/XMLSchema-instance">
  <dc:title>{}</dc:title>
  <dc:creator>{}</dc:creator>
  <cp:lastModifiedBy>{}</cp:lastModifiedBy>
</cp:coreProperties>"#,
            escape_xml(title),
            escape_xml(author),
            escape_xml(author),
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_presentation_xml<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/presentation.xml", options)?;

        let mut slide_refs = String::new();
        for i in 1..=self.slides.len() {
            slide_refs.push_str(&format!(
                "    <p:sldId id=\"{}\" r:id=\"rId{}\"/>\n",
                255 + i,
                i + 3 // rId1=slideMaster, rId2=presProps, rId3=theme
            ));
        }

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentation xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" saveSubsetFonts="1">
  <p:sldMasterIdLst>
    <p:sldMasterId id="2147483648" r:id="rId1"/>
  </p:sldMasterIdLst>
  <p:sldIdLst>
{}  </p:sldIdLst>
  <p:sldSz cx="{}" cy="{}"/>
  <p:notesSz cx="{}" cy="{}"/>
</p:presentation>"#,
            NS_DRAWING,
            NS_RELATIONSHIPS,
            NS_PRESENTATION,
            slide_refs,
            SLIDE_WIDTH_EMU,
            SLIDE_HEIGHT_EMU,
            SLIDE_HEIGHT_EMU, // notes pages are rotated
            SLIDE_WIDTH_EMU,
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_presentation_rels<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/_rels/presentation.xml.rels", options)?;

        let mut rels = String::from(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships">
  <Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/slideMaster" Target="slideMasters/slideMaster1.xml"/>
  <Relationship Id="rId2" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/presProps" Target="presProps.xml"/>
  <Relationship Id="rId3" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/theme" Target="theme/theme1.xml"/>
"#,
        );

        for i in 1..=self.slides.len() {
            rels.push_str(&format!(
                "  <Relationship Id=\"rId{}\" Type=\"{}\" Target=\"slides/slide{}.xml\"/>\n",
                i + 3,
                REL_TYPE_SLIDE,
                i
            ));
        }

        rels.push_str("</Relationships>");
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    fn write_pres_props<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/presProps.xml", options)?;
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:presentationPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:extLst/>
</p:presentationPr>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_view_props<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/viewProps.xml", options)?;
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:viewPr xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:normalViewPr>
    <p:restoredLeft sz="15620"/>
    <p:restoredTop sz="94660"/>
  </p:normalViewPr>
</p:viewPr>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );
        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    /// Theme part mapping the deck palette onto the OOXML color scheme.
    fn write_theme<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/theme/theme1.xml", options)?;

        let p = &self.theme.palette;
        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<a:theme xmlns:a="{ns}" name="{name}">
  <a:themeElements>
    <a:clrScheme name="{name}">
      <a:dk1><a:srgbClr val="{text}"/></a:dk1>
      <a:lt1><a:srgbClr val="{bg}"/></a:lt1>
      <a:dk2><a:srgbClr val="{muted}"/></a:dk2>
      <a:lt2><a:srgbClr val="{surface}"/></a:lt2>
      <a:accent1><a:srgbClr val="{primary}"/></a:accent1>
      <a:accent2><a:srgbClr val="{secondary}"/></a:accent2>
      <a:accent3><a:srgbClr val="{accent}"/></a:accent3>
      <a:accent4><a:srgbClr val="{border}"/></a:accent4>
      <a:accent5><a:srgbClr val="{primary}"/></a:accent5>
      <a:accent6><a:srgbClr val="{secondary}"/></a:accent6>
      <a:hlink><a:srgbClr val="{primary}"/></a:hlink>
      <a:folHlink><a:srgbClr val="{secondary}"/></a:folHlink>
    </a:clrScheme>
    <a:fontScheme name="{name}">
      <a:majorFont>
        <a:latin typeface="{heading}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:majorFont>
      <a:minorFont>
        <a:latin typeface="{body}"/>
        <a:ea typeface=""/>
        <a:cs typeface=""/>
      </a:minorFont>
    </a:fontScheme>
    <a:fmtScheme name="Office">
      <a:fillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:fillStyleLst>
      <a:lnStyleLst>
        <a:ln w="6350"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="12700"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
        <a:ln w="19050"><a:solidFill><a:schemeClr val="phClr"/></a:solidFill></a:ln>
      </a:lnStyleLst>
      <a:effectStyleLst>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
        <a:effectStyle><a:effectLst/></a:effectStyle>
      </a:effectStyleLst>
      <a:bgFillStyleLst>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
        <a:solidFill><a:schemeClr val="phClr"/></a:solidFill>
      </a:bgFillStyleLst>
    </a:fmtScheme>
  </a:themeElements>
</a:theme>"#,
            ns = NS_DRAWING,
            name = escape_xml(&self.theme.name),
            text = srgb(&p.text),
            bg = srgb(&p.background),
            muted = srgb(&p.text_muted),
            surface = srgb(&p.surface),
            primary = srgb(&p.primary),
            secondary = srgb(&p.secondary),
            accent = srgb(&p.accent),
            border = srgb(&p.border),
            heading = escape_xml(&self.theme.fonts.heading),
            body = escape_xml(&self.theme.fonts.body),
        );

        zip.write_all(content.as_bytes())?;
        Ok(())
    }

    fn write_slide_master<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        zip.start_file("ppt/slideMasters/slideMaster1.xml", options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldMaster xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:cSld>
    <p:bg>
      <p:bgRef idx="1001">
        <a:schemeClr val="bg1"/>
      </p:bgRef>
    </p:bg>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMap bg1="lt1" tx1="dk1" bg2="lt2" tx2="dk2" accent1="accent1" accent2="accent2" accent3="accent3" accent4="accent4" accent5="accent5" accent6="accent6" hlink="hlink" folHlink="folHlink"/>
  <p:sldLayoutIdLst>
    <p:sldLayoutId id="2147483649" r:id="rId1"/>
    <p:sldLayoutId id="2147483650" r:id="rId2"/>
  </p:sldLayoutIdLst>
</p:sldMaster>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file("ppt/slideMasters/_rels/slideMaster1.xml.rels", options)?;
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
  <Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout1.xml"/>
  <Relationship Id="rId2" Type="{}" Target="../slideLayouts/slideLayout2.xml"/>
  <Relationship Id="rId3" Type="{}" Target="../theme/theme1.xml"/>
</Relationships>"#,
            NS_RELATIONSHIPS, REL_TYPE_SLIDE_LAYOUT, REL_TYPE_SLIDE_LAYOUT, REL_TYPE_THEME
        );
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    fn write_slide_layouts<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
    ) -> Result<()> {
        let layouts = [("slideLayout1", "title", "Title Slide"), ("slideLayout2", "blank", "Blank")];

        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
  <Relationship Id="rId1" Type="{}" Target="../slideMasters/slideMaster1.xml"/>
</Relationships>"#,
            NS_RELATIONSHIPS, REL_TYPE_SLIDE_MASTER
        );

        for (file, kind, name) in layouts {
            zip.start_file(format!("ppt/slideLayouts/{}.xml", file), options)?;
            let content = format!(
                r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sldLayout xmlns:a="{}" xmlns:r="{}" xmlns:p="{}" type="{}" preserve="1">
  <p:cSld name="{}">
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
    </p:spTree>
  </p:cSld>
  <p:clrMapOvr><a:masterClrMapping/></p:clrMapOvr>
</p:sldLayout>"#,
                NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, kind, name
            );
            zip.write_all(content.as_bytes())?;

            zip.start_file(format!("ppt/slideLayouts/_rels/{}.xml.rels", file), options)?;
            zip.write_all(rels.as_bytes())?;
        }

        Ok(())
    }

    fn write_slide<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        slide_num: usize,
        slide: &SlideRecord,
        media: Option<&SlideMedia>,
    ) -> Result<()> {
        zip.start_file(format!("ppt/slides/slide{}.xml", slide_num), options)?;

        let layout = if matches!(slide.body, deckgen_schema::SlideBody::Title { .. }) {
            1
        } else {
            2
        };

        let shapes = slide_shapes(
            slide,
            &self.theme,
            self.slides.len(),
            media.map(|m| m.rel_id.as_str()),
        );

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:sld xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:cSld>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
{}    </p:spTree>
  </p:cSld>
</p:sld>"#,
            NS_DRAWING, NS_RELATIONSHIPS, NS_PRESENTATION, shapes
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file(format!("ppt/slides/_rels/slide{}.xml.rels", slide_num), options)?;

        let mut rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
  <Relationship Id="rId1" Type="{}" Target="../slideLayouts/slideLayout{}.xml"/>
"#,
            NS_RELATIONSHIPS, REL_TYPE_SLIDE_LAYOUT, layout
        );

        if slide.notes.is_some() {
            rels.push_str(&format!(
                "  <Relationship Id=\"rId2\" Type=\"{}\" Target=\"../notesSlides/notesSlide{}.xml\"/>\n",
                REL_TYPE_NOTES_SLIDE, slide_num
            ));
        }
        if let Some(m) = media {
            rels.push_str(&format!(
                "  <Relationship Id=\"{}\" Type=\"{}\" Target=\"../media/{}\"/>\n",
                m.rel_id, REL_TYPE_IMAGE, m.item.embedded_name
            ));
        }

        rels.push_str("</Relationships>");
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }

    fn write_notes_slide<W: Write + std::io::Seek>(
        &self,
        zip: &mut ZipWriter<W>,
        options: SimpleFileOptions,
        slide_num: usize,
        slide: &SlideRecord,
    ) -> Result<()> {
        let notes = slide.notes.as_deref().unwrap_or_default();

        zip.start_file(format!("ppt/notesSlides/notesSlide{}.xml", slide_num), options)?;

        let content = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<p:notes xmlns:a="{}" xmlns:r="{}" xmlns:p="{}">
  <p:cSld>
    <p:spTree>
      <p:nvGrpSpPr>
        <p:cNvPr id="1" name=""/>
        <p:cNvGrpSpPr/>
        <p:nvPr/>
      </p:nvGrpSpPr>
      <p:grpSpPr/>
      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="2" name="Slide Image Placeholder 1"/>
          <p:cNvSpPr><a:spLocks noGrp="1" noRot="1" noChangeAspect="1"/></p:cNvSpPr>
          <p:nvPr><p:ph type="sldImg"/></p:nvPr>
        </p:nvSpPr>
        <p:spPr/>
      </p:sp>
      <p:sp>
        <p:nvSpPr>
          <p:cNvPr id="3" name="Notes Placeholder 2"/>
          <p:cNvSpPr><a:spLocks noGrp="1"/></p:cNvSpPr>
          <p:nvPr><p:ph type="body" idx="1"/></p:nvPr>
        </p:nvSpPr>
        <p:spPr/>
        <p:txBody>
          <a:bodyPr/>
          <a:lstStyle/>
          <a:p>
            <a:r>
              <a:rPr lang="en-US"/>
              <a:t>{}</a:t>
            </a:r>
          </a:p>
        </p:txBody>
      </p:sp>
    </p:spTree>
  </p:cSld>
</p:notes>"#,
            NS_DRAWING,
            NS_RELATIONSHIPS,
            NS_PRESENTATION,
            escape_xml(notes)
        );
        zip.write_all(content.as_bytes())?;

        zip.start_file(
            format!("ppt/notesSlides/_rels/notesSlide{}.xml.rels", slide_num),
            options,
        )?;
        let rels = format!(
            r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="{}">
  <Relationship Id="rId1" Type="{}" Target="../slides/slide{}.xml"/>
</Relationships>"#,
            NS_RELATIONSHIPS, REL_TYPE_SLIDE, slide_num
        );
        zip.write_all(rels.as_bytes())?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use deckgen_schema::{Complexity, SlideBody};
    use std::io::Read;
    use zip::ZipArchive;

    const TINY_PNG: &str = "data:image/png;base64,iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn theme() -> ThemeConfig {
        ThemeConfig::preset("modern", Complexity::Standard)
    }

    fn archive(bytes: Vec<u8>) -> ZipArchive<Cursor<Vec<u8>>> {
        ZipArchive::new(Cursor::new(bytes)).unwrap()
    }

    #[test]
    fn test_empty_deck_is_valid_package() {
        let writer = DeckWriter::new(theme()).with_title("Empty");
        let mut archive = archive(writer.generate().unwrap());
        assert!(archive.by_name("[Content_Types].xml").is_ok());
        assert!(archive.by_name("ppt/presentation.xml").is_ok());
        assert!(archive.by_name("ppt/theme/theme1.xml").is_ok());
    }

    #[test]
    fn test_one_part_per_slide() {
        let mut writer = DeckWriter::new(theme());
        writer.add_slides(vec![
            SlideRecord::title_slide(0, "Hello", Some("World".to_string())),
            SlideRecord::content(1, "Body", vec!["point".to_string()]),
        ]);

        let mut archive = archive(writer.generate().unwrap());
        assert!(archive.by_name("ppt/slides/slide1.xml").is_ok());
        assert!(archive.by_name("ppt/slides/slide2.xml").is_ok());
        assert!(archive.by_name("ppt/slides/slide3.xml").is_err());
    }

    #[test]
    fn test_notes_written_only_when_present() {
        let mut writer = DeckWriter::new(theme());
        writer.add_slide(SlideRecord::content(0, "No notes", vec![]));
        writer.add_slide(SlideRecord::content(1, "Notes", vec![]).with_notes("Say hello"));

        let mut archive = archive(writer.generate().unwrap());
        assert!(archive.by_name("ppt/notesSlides/notesSlide1.xml").is_err());

        let mut xml = String::new();
        archive
            .by_name("ppt/notesSlides/notesSlide2.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("Say hello"));
    }

    #[test]
    fn test_embedded_image_lands_in_media() {
        let mut writer = DeckWriter::new(theme());
        writer.add_slide(SlideRecord {
            index: 0,
            title: "Pic".to_string(),
            notes: None,
            body: SlideBody::ImageText {
                key_number: None,
                key_number_label: None,
                bullets: Some(vec!["caption".to_string()]),
                image_data_url: Some(TINY_PNG.to_string()),
            },
        });

        let mut archive = archive(writer.generate().unwrap());
        assert!(archive.by_name("ppt/media/image1.png").is_ok());

        let mut rels = String::new();
        archive
            .by_name("ppt/slides/_rels/slide1.xml.rels")
            .unwrap()
            .read_to_string(&mut rels)
            .unwrap();
        assert!(rels.contains("../media/image1.png"));
    }

    #[test]
    fn test_bad_image_is_dropped_not_fatal() {
        let mut writer = DeckWriter::new(theme());
        writer.add_slide(SlideRecord {
            index: 0,
            title: "Broken".to_string(),
            notes: None,
            body: SlideBody::ImageText {
                key_number: Some("7".to_string()),
                key_number_label: None,
                bullets: None,
                image_data_url: Some("data:image/png;base64,%%%%".to_string()),
            },
        });

        let mut archive = archive(writer.generate().unwrap());
        assert!(archive.by_name("ppt/media/image1.png").is_err());

        let mut xml = String::new();
        archive
            .by_name("ppt/slides/slide1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        // Falls back to the key-number region.
        assert!(xml.contains("Key Number"));
    }

    #[test]
    fn test_theme_carries_palette() {
        let writer = DeckWriter::new(ThemeConfig::preset("midnight", Complexity::Rich));
        let mut archive = archive(writer.generate().unwrap());
        let mut xml = String::new();
        archive
            .by_name("ppt/theme/theme1.xml")
            .unwrap()
            .read_to_string(&mut xml)
            .unwrap();
        assert!(xml.contains("midnight"));
    }
}
